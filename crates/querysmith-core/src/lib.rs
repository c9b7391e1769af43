//! # Querysmith Core Library
//!
//! This crate provides the query composition engine for the Querysmith search
//! query builder, together with the static data and persistence it works
//! with. It performs no network I/O; the generation service client lives in
//! `querysmith-generator`.
//!
//! ## Architecture
//!
//! - **Types** (`types`): Operators, query parts, preset templates
//! - **Catalog** (`catalog`): The operator library, looked up by id
//! - **Presets** (`presets`): Built-in preset templates
//! - **Composer** (`composer`): The part sequence and its mutation rules
//! - **Preview** (`preview`): Search URL for a serialized query
//! - **Generate** (`generate`): Request building and model reply parsing
//! - **Persistence** (`persistence`): Saving the query and preferences
//! - **Config** (`config`): Configuration management
//!
//! ## Example
//!
//! ```rust
//! use querysmith_core::{Catalog, Composer, Language, PresetLibrary, SequentialIds};
//!
//! let catalog = Catalog::builtin(Language::En);
//! let presets = PresetLibrary::builtin(Language::En);
//! let mut composer = Composer::new(SequentialIds::new());
//!
//! composer.apply_template(Some("scientific"), presets.as_slice(), &catalog);
//! assert_eq!(composer.serialize(), "site:edu OR site:gov filetype:pdf");
//! ```

pub mod catalog;
pub mod composer;
pub mod config;
pub mod error;
pub mod generate;
pub mod ids;
pub mod locale;
pub mod persistence;
pub mod presets;
pub mod preview;
pub mod types;

// Re-export commonly used types
pub use catalog::Catalog;
pub use composer::Composer;
pub use config::{Config, GeneratorConfig};
pub use error::{QuerysmithError, Result};
pub use generate::{parse_response, GeneratedResponse};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use locale::{Language, Theme, UiStrings};
pub use persistence::{FileStore, KeyValueStore, MemoryStore, Preferences, QueryStore};
pub use presets::PresetLibrary;
pub use preview::search_url;
pub use types::{
    Operator, OperatorCategory, PartId, PartKind, PresetTemplate, QueryPart, RawPart,
    TemplatePart,
};
