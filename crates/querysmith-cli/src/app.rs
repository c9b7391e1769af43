//! Application state management.

use anyhow::{bail, Context};
use querysmith_core::{
    search_url, Catalog, Composer, Config, FileStore, Language, PartId, Preferences,
    PresetLibrary, QueryPart, QueryStore, RawPart, Theme, UiStrings, UuidIds,
};
use tracing::info;

/// Shared application state.
pub struct App {
    /// Configuration
    pub config: Config,

    /// Operator library in the current language
    pub catalog: Catalog,

    /// Preset templates in the current language
    pub presets: PresetLibrary,

    /// The query being built
    pub composer: Composer,

    /// Query and preference persistence
    pub store: QueryStore<FileStore>,

    /// Theme and language
    pub prefs: Preferences,
}

impl App {
    /// Create a new application instance, restoring the saved query.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let data_dir = config.data_dir()?;
        let store = QueryStore::new(FileStore::open(&data_dir));
        let prefs = store.load_preferences(config.general.language);

        let catalog = Catalog::builtin(prefs.language);
        let presets = PresetLibrary::builtin(prefs.language);
        let composer = store.restore(&catalog, presets.as_slice(), UuidIds);

        info!(
            data_dir = %data_dir.display(),
            parts = composer.len(),
            language = %prefs.language,
            "Application initialized"
        );

        Ok(App {
            config,
            catalog,
            presets,
            composer,
            store,
            prefs,
        })
    }

    /// Labels for the current language.
    pub fn strings(&self) -> &'static UiStrings {
        self.prefs.language.strings()
    }

    /// Save the current query.
    pub fn save(&self) {
        self.store.save(&self.composer);
    }

    /// The serialized query.
    pub fn query(&self) -> String {
        self.composer.serialize()
    }

    /// Search URL for the current query, `None` while it is empty.
    pub fn url(&self) -> Option<String> {
        search_url(&self.config.search.engine_url, &self.query())
    }

    /// Find a part by 1-based position or by id.
    pub fn resolve_part(&self, target: &str) -> anyhow::Result<&QueryPart> {
        let parts = self.composer.parts();

        if let Ok(n) = target.parse::<usize>() {
            if n >= 1 && n <= parts.len() {
                return Ok(&parts[n - 1]);
            }
        }

        parts
            .iter()
            .find(|p| p.id.as_str() == target)
            .with_context(|| format!("No part '{}' (use a position 1-{} or a part id)", target, parts.len()))
    }

    fn resolve_editable(&self, target: &str) -> anyhow::Result<PartId> {
        let part = self.resolve_part(target)?;
        if part.locked {
            bail!("Part '{}' belongs to the active preset and cannot be changed", target);
        }
        Ok(part.id.clone())
    }

    fn resolve_value_part(&self, target: &str) -> anyhow::Result<PartId> {
        let id = self.resolve_editable(target)?;
        if self.composer.get(&id).is_some_and(|p| !p.is_value_editable()) {
            bail!("Part '{}' is a fixed operator and has no value to set", target);
        }
        Ok(id)
    }

    // === Editing ===

    /// Append an operator, optionally with its argument.
    ///
    /// With a value, the value is typed as text first and the operator
    /// applied to it, the same way the interactive builder works.
    pub fn add_operator(&mut self, operator_id: &str, value: Option<&str>) -> anyhow::Result<()> {
        let op = self.catalog.require(operator_id)?.clone();

        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => {
                if !op.takes_value {
                    bail!("Operator '{}' does not take a value", op.id);
                }
                self.type_text(value);
                self.composer.append_operator(&op);
            }
            None => self.composer.append_operator(&op),
        }

        self.save();
        Ok(())
    }

    /// Append a text part, filling a trailing blank slot when there is one.
    pub fn add_text(&mut self, value: Option<&str>) {
        match value {
            Some(value) => self.type_text(value),
            None => self.composer.append_text(),
        }
        self.save();
    }

    fn type_text(&mut self, value: &str) {
        let reuse_last = self
            .composer
            .parts()
            .last()
            .is_some_and(|p| !p.locked && p.is_blank_text());
        if !reuse_last {
            self.composer.append_text();
        }
        if let Some(last) = self.composer.parts().last() {
            let id = last.id.clone();
            self.composer.update_value(&id, value);
        }
    }

    pub fn set_value(&mut self, target: &str, value: &str) -> anyhow::Result<()> {
        let id = self.resolve_value_part(target)?;
        self.composer.update_value(&id, value);
        self.save();
        Ok(())
    }

    pub fn remove(&mut self, target: &str) -> anyhow::Result<()> {
        let id = self.resolve_editable(target)?;
        self.composer.remove(&id);
        self.save();
        Ok(())
    }

    /// Apply a preset by id, or clear the active one with `None`.
    pub fn apply_preset(&mut self, preset_id: Option<&str>) -> anyhow::Result<()> {
        if let Some(id) = preset_id {
            self.presets.require(id)?;
        }
        self.composer
            .apply_template(preset_id, self.presets.as_slice(), &self.catalog);
        self.save();
        Ok(())
    }

    /// Switch to the preset after the active one, wrapping to none.
    pub fn cycle_preset(&mut self) {
        let next = self
            .presets
            .next_after(self.composer.active_preset())
            .map(|t| t.id.clone());
        self.composer
            .apply_template(next.as_deref(), self.presets.as_slice(), &self.catalog);
        self.save();
    }

    pub fn reset(&mut self) {
        self.composer.reset();
        self.save();
    }

    /// Replace the query with generated parts for `prompt`.
    pub fn import_generated(&mut self, raw: &[RawPart], prompt: &str) {
        self.composer.import_generated(raw, &self.catalog, prompt);
        self.save();
    }

    // === Preferences ===

    pub fn set_theme(&mut self, theme: Theme) {
        self.prefs.theme = theme;
        self.store.save_preferences(&self.prefs);
    }

    /// Switch language, reload the catalog and presets in it, and move the
    /// current operator parts over to the new catalog.
    pub fn set_language(&mut self, language: Language) {
        self.prefs.language = language;
        self.catalog = Catalog::builtin(language);
        self.presets = PresetLibrary::builtin(language);

        self.composer.relink_operators(&self.catalog);
        let active = self.composer.active_preset().map(str::to_string);
        if active.is_some() {
            self.composer
                .apply_template(active.as_deref(), self.presets.as_slice(), &self.catalog);
        }
        self.save();
        self.store.save_preferences(&self.prefs);
    }
}
