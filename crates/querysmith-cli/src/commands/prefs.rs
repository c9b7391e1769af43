//! Preference commands - theme and language.

use crate::app::App;
use querysmith_core::{Config, Language, Theme};

/// Run the theme command; toggles when no theme is given.
pub fn theme(config: Config, value: Option<Theme>) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    let theme = value.unwrap_or_else(|| app.prefs.theme.toggled());
    app.set_theme(theme);
    println!("{}", theme);
    Ok(())
}

/// Run the language command; toggles when no language is given.
pub fn language(config: Config, value: Option<Language>) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    let language = value.unwrap_or_else(|| app.prefs.language.toggled());
    app.set_language(language);
    println!("{}", language);
    Ok(())
}
