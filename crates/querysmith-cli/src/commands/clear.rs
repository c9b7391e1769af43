//! Clear command - forget the saved query and preferences.

use querysmith_core::{Config, FileStore};
use std::io::{self, Write};

/// Run the clear command.
pub fn run(config: Config, skip_confirm: bool) -> anyhow::Result<()> {
    let store = FileStore::open(config.data_dir()?);

    if !store.exists() {
        println!("No saved state. Nothing to clear.");
        return Ok(());
    }

    if !skip_confirm {
        print!(
            "This will delete the saved query and preferences in {}. Are you sure? [y/N] ",
            store.path().display()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.clear()?;
    println!("Saved state cleared.");

    Ok(())
}
