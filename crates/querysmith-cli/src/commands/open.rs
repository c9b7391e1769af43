//! Open command - run the search in the system browser.

use crate::app::App;
use querysmith_core::Config;
use tracing::info;

/// Run the open command.
pub fn run(config: Config) -> anyhow::Result<()> {
    let app = App::new(config)?;

    let Some(url) = app.url() else {
        println!("{}", app.strings().query_placeholder);
        return Ok(());
    };

    info!(url = %url, "Opening search");
    open::that(&url)?;
    println!("{}", url);
    Ok(())
}
