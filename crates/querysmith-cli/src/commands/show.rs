//! Show command - print the current query.

use crate::app::App;
use crate::OutputFormat;
use querysmith_core::{Config, PartKind, QueryPart};

/// Run the show command.
pub fn run(config: Config, output: OutputFormat) -> anyhow::Result<()> {
    let app = App::new(config)?;

    match output {
        OutputFormat::Text => print_text(&app),
        OutputFormat::Json => {
            let parts: Vec<serde_json::Value> = app
                .composer
                .parts()
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let kind = if p.is_text() { "text" } else { "operator" };
                    serde_json::json!({
                        "position": i + 1,
                        "id": p.id.as_str(),
                        "type": kind,
                        "operatorId": p.operator_id(),
                        "value": p.value,
                        "locked": p.locked,
                    })
                })
                .collect();

            let json = serde_json::json!({
                "query": app.query(),
                "url": app.url(),
                "preset": app.composer.active_preset(),
                "parts": parts,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

/// Print the parts list followed by the query and URL.
pub fn print_text(app: &App) {
    let strings = app.strings();

    match app.composer.active_preset().and_then(|id| app.presets.get(id)) {
        Some(preset) => println!("{}: {}", strings.search_preset, preset.name),
        None => println!("{}: {}", strings.search_preset, strings.standard_mode),
    }
    println!();

    for (i, part) in app.composer.parts().iter().enumerate() {
        let lock = if part.locked {
            format!(" [{}]", strings.locked)
        } else {
            String::new()
        };
        println!("  {:>2}. {}{}", i + 1, describe(part), lock);
    }

    println!();
    let query = app.query();
    if query.is_empty() {
        println!("{}", strings.query_placeholder);
    } else {
        println!("{}: {}", strings.live_preview, query);
    }
    if let Some(url) = app.url() {
        println!("{}", url);
    }
}

fn describe(part: &QueryPart) -> String {
    match &part.kind {
        PartKind::Text if part.value.is_empty() => "text (empty)".to_string(),
        PartKind::Text => format!("text      {}", part.value),
        PartKind::Operator(op) if op.takes_value => {
            format!("{:<9} {}{}", op.id, op.token, part.value)
        }
        PartKind::Operator(op) => format!("{:<9} {}", op.id, op.token),
    }
}
