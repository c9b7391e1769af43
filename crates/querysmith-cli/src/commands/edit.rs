//! Editing commands - change the saved query one step at a time.
//!
//! Each command loads the saved query, applies one change, saves it and
//! prints the result.

use crate::app::App;
use crate::commands::show::print_text;
use querysmith_core::Config;

/// Run the add-op command.
pub fn add_operator(config: Config, id: &str, value: Option<&str>) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.add_operator(id, value)?;
    print_text(&app);
    Ok(())
}

/// Run the add-text command.
pub fn add_text(config: Config, value: Option<&str>) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.add_text(value);
    print_text(&app);
    Ok(())
}

/// Run the set command.
pub fn set(config: Config, part: &str, value: &str) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.set_value(part, value)?;
    print_text(&app);
    Ok(())
}

/// Run the remove command.
pub fn remove(config: Config, part: &str) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.remove(part)?;
    print_text(&app);
    Ok(())
}

/// Run the preset command; `None` clears the active preset.
pub fn preset(config: Config, id: Option<&str>) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.apply_preset(id)?;
    print_text(&app);
    Ok(())
}

/// Run the reset command.
pub fn reset(config: Config) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.reset();
    println!("{}", app.strings().query_placeholder);
    Ok(())
}
