//! Generation commands - build a query from a description, list models.

use crate::app::App;
use crate::commands::show::print_text;
use querysmith_core::Config;
use querysmith_generator::{GeneratorClient, GeneratorError};
use tracing::info;

/// Run the generate command.
pub fn run(config: Config, prompt: &str, model: Option<String>) -> anyhow::Result<()> {
    let mut app = App::new(config)?;

    let mut client = GeneratorClient::from_config(&app.config.generator)?;
    if let Some(model) = model {
        client.set_model(model);
    }

    eprintln!("{}", app.strings().generating);
    match client.generate(prompt, &app.catalog) {
        Ok(raw) => {
            info!(parts = raw.len(), "Importing generated query");
            app.import_generated(&raw, prompt);
            print_text(&app);
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "{}: {}",
                app.strings().ai_error_title,
                failure_message(&app, &e)
            );
            Err(e.into())
        }
    }
}

/// The localized message shown when generation fails.
pub fn failure_message(app: &App, err: &GeneratorError) -> &'static str {
    let strings = app.strings();
    if err.is_timeout() {
        strings.ai_timeout
    } else {
        strings.ai_error_body
    }
}

/// Run the models command.
pub fn models(config: Config) -> anyhow::Result<()> {
    let client = GeneratorClient::from_config(&config.generator)?;
    let models = client.list_models()?;

    for model in &models {
        let marker = if model.id == client.model() { "*" } else { " " };
        match &model.name {
            Some(name) => println!("{} {:<48} {}", marker, model.id, name),
            None => println!("{} {}", marker, model.id),
        }
    }

    eprintln!();
    eprintln!("{} models", models.len());
    Ok(())
}
