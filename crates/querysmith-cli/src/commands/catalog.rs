//! Catalog commands - list operators and presets.

use querysmith_core::{Catalog, Config, FileStore, OperatorCategory, PresetLibrary, QueryStore};

/// Run the operators command.
pub fn operators(config: Config, category: Option<OperatorCategory>) -> anyhow::Result<()> {
    let store = QueryStore::new(FileStore::open(config.data_dir()?));
    let language = store.load_preferences(config.general.language).language;
    let strings = language.strings();
    let catalog = Catalog::builtin(language);

    let categories = match category {
        Some(c) => vec![c],
        None => catalog.categories(),
    };

    for category in categories {
        println!("{} ({})", strings.category(category), category);
        for op in catalog.in_category(Some(category)) {
            let token = if op.takes_value {
                format!("{}<value>", op.token)
            } else {
                op.token.clone()
            };
            println!("  {:<12} {:<18} {}", op.id, token, op.description);
            if !op.example.is_empty() {
                println!("  {:<12} {:<18} e.g. {}", "", "", op.example);
            }
        }
        println!();
    }

    Ok(())
}

/// Run the presets command.
pub fn presets(config: Config) -> anyhow::Result<()> {
    let store = QueryStore::new(FileStore::open(config.data_dir()?));
    let language = store.load_preferences(config.general.language).language;
    let catalog = Catalog::builtin(language);
    let library = PresetLibrary::builtin(language);

    println!("{}", language.strings().search_preset);
    println!();

    for template in library.iter() {
        println!("  {:<12} {}", template.id, template.name);
        println!("  {:<12} {}", "", template.description);

        let tokens: Vec<String> = template
            .parts
            .iter()
            .filter_map(|part| {
                let op = catalog.get(&part.operator_id)?;
                Some(if op.takes_value {
                    format!("{}{}", op.token, part.value)
                } else {
                    op.token.clone()
                })
            })
            .collect();
        println!("  {:<12} {}", "", tokens.join(" "));
        println!();
    }

    Ok(())
}
