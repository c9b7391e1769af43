//! The query composition engine.
//!
//! [`Composer`] owns the ordered sequence of query parts and is the only
//! place that mutates it. Every operation runs to completion synchronously,
//! never performs I/O and never fails: unknown ids and locked parts are
//! silently ignored.
//!
//! ## Invariants
//!
//! - Locked parts (injected by a preset) always form a prefix of the sequence.
//! - The editable (unlocked) portion is never empty. Whenever an operation
//!   would leave it empty, a fresh blank text part is appended.
//!
//! ## Example
//!
//! ```rust
//! use querysmith_core::{Catalog, Composer, Language, SequentialIds};
//!
//! let catalog = Catalog::builtin(Language::En);
//! let mut composer = Composer::new(SequentialIds::new());
//!
//! composer.append_operator(catalog.get("site").unwrap());
//! let id = composer.parts()[0].id.clone();
//! composer.update_value(&id, "example.com");
//! assert_eq!(composer.serialize(), "site:example.com");
//! ```

use crate::catalog::Catalog;
use crate::ids::IdGenerator;
use crate::types::{Operator, PartId, PartKind, PresetTemplate, QueryPart, RawPart};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Owns the query part sequence and the active preset.
pub struct Composer {
    parts: Vec<QueryPart>,
    active_preset: Option<String>,
    ids: Box<dyn IdGenerator>,
}

impl fmt::Debug for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("parts", &self.parts)
            .field("active_preset", &self.active_preset)
            .finish()
    }
}

impl Composer {
    /// Create a composer holding a single blank text part.
    pub fn new(ids: impl IdGenerator + 'static) -> Self {
        let mut composer = Composer {
            parts: Vec::new(),
            active_preset: None,
            ids: Box::new(ids),
        };
        let blank = composer.blank_text();
        composer.parts.push(blank);
        composer
    }

    /// Create a composer from previously saved parts.
    ///
    /// Locked parts are moved in front of editable ones, and a blank text part
    /// is added if nothing editable remains.
    pub fn from_parts(parts: Vec<QueryPart>, ids: impl IdGenerator + 'static) -> Self {
        let (mut locked, editable): (Vec<_>, Vec<_>) = parts.into_iter().partition(|p| p.locked);
        locked.extend(editable);

        let mut composer = Composer {
            parts: locked,
            active_preset: None,
            ids: Box::new(ids),
        };
        composer.ensure_editable();
        composer
    }

    // === Accessors ===

    /// All parts in sequence order
    pub fn parts(&self) -> &[QueryPart] {
        &self.parts
    }

    /// The unlocked parts, in order
    pub fn editable_parts(&self) -> impl Iterator<Item = &QueryPart> {
        self.parts.iter().filter(|p| !p.locked)
    }

    /// The preset-owned prefix
    pub fn locked_parts(&self) -> impl Iterator<Item = &QueryPart> {
        self.parts.iter().filter(|p| p.locked)
    }

    /// Owned copy of the editable parts, for persistence
    pub fn snapshot(&self) -> Vec<QueryPart> {
        self.editable_parts().cloned().collect()
    }

    /// Id of the applied preset, if any
    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    pub fn get(&self, id: &PartId) -> Option<&QueryPart> {
        self.parts.iter().find(|p| &p.id == id)
    }

    pub fn position(&self, id: &PartId) -> Option<usize> {
        self.parts.iter().position(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false: the sequence holds at least one editable part.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    // === Mutations ===

    /// Add an operator to the end of the query.
    ///
    /// A value-taking operator applied right after non-blank free text turns
    /// that text into the operator's argument instead of adding a new part.
    /// Operators without a value are always followed by a fresh text slot.
    pub fn append_operator(&mut self, op: &Arc<Operator>) {
        if op.takes_value {
            if let Some(last) = self.parts.last_mut() {
                if !last.locked && last.is_text() && !last.value.trim().is_empty() {
                    debug!(part = %last.id, operator = %op.id, "Tagging text part with operator");
                    last.kind = PartKind::Operator(Arc::clone(op));
                    return;
                }
            }
        }

        let value = if op.takes_value {
            String::new()
        } else {
            op.token.clone()
        };
        let id = self.ids.next_id(&format!("op-{}", op.id));
        let part = QueryPart::operator(id, Arc::clone(op), value);

        // A lone blank slot is replaced rather than left dangling before the operator
        if self.editable_is_single_blank() {
            self.parts.retain(|p| p.locked);
        }

        debug!(part = %part.id, operator = %op.id, "Appending operator part");
        self.parts.push(part);

        if !op.takes_value {
            let blank = self.blank_text();
            self.parts.push(blank);
        }
    }

    /// Append an empty text part.
    pub fn append_text(&mut self) {
        let blank = self.blank_text();
        self.parts.push(blank);
    }

    /// Set the value of a part. Locked, fixed-token and unknown parts are
    /// left alone.
    pub fn update_value(&mut self, id: &PartId, value: impl Into<String>) {
        if let Some(part) = self.parts.iter_mut().find(|p| &p.id == id) {
            if part.is_value_editable() {
                part.value = value.into();
            }
        }
    }

    /// Remove a part. Locked and unknown parts are left alone.
    pub fn remove(&mut self, id: &PartId) {
        let Some(pos) = self.position(id) else {
            return;
        };
        if self.parts[pos].locked {
            return;
        }

        self.parts.remove(pos);
        self.ensure_editable();
    }

    /// Point editable operator parts at the matching operators of `catalog`,
    /// e.g. after switching language. Values and ids are kept; operators the
    /// catalog does not know keep their current definition.
    pub fn relink_operators(&mut self, catalog: &Catalog) {
        for part in self.parts.iter_mut().filter(|p| !p.locked) {
            if let PartKind::Operator(op) = &part.kind {
                if let Some(fresh) = catalog.get(&op.id) {
                    part.kind = PartKind::Operator(Arc::clone(fresh));
                }
            }
        }
    }

    /// Apply the preset `template_id`, or clear the preset for `None` or an
    /// unknown id.
    ///
    /// The locked prefix is always rebuilt from scratch. Editable parts are
    /// kept, except that an empty or single-blank editable portion is
    /// normalized to one fresh blank text part. Template entries naming an
    /// operator missing from `catalog` are dropped.
    pub fn apply_template(
        &mut self,
        template_id: Option<&str>,
        templates: &[PresetTemplate],
        catalog: &Catalog,
    ) {
        let editable: Vec<QueryPart> = std::mem::take(&mut self.parts)
            .into_iter()
            .filter(|p| !p.locked)
            .collect();

        let baseline =
            if editable.is_empty() || (editable.len() == 1 && editable[0].is_blank_text()) {
                vec![self.blank_text()]
            } else {
                editable
            };

        let template = template_id.and_then(|id| templates.iter().find(|t| t.id == id));

        let Some(template) = template else {
            debug!(requested = ?template_id, "Clearing preset");
            self.parts = baseline;
            self.active_preset = None;
            return;
        };

        let mut parts = Vec::with_capacity(template.parts.len() + baseline.len());
        for (i, entry) in template.parts.iter().enumerate() {
            let Some(op) = catalog.get(&entry.operator_id) else {
                debug!(
                    preset = %template.id,
                    operator = %entry.operator_id,
                    "Dropping preset entry with unknown operator"
                );
                continue;
            };
            let value = if op.takes_value {
                entry.value.clone()
            } else {
                op.token.clone()
            };
            let id = self.ids.next_id(&format!("preset-{}-{}", template.id, i));
            parts.push(QueryPart::operator(id, Arc::clone(op), value).into_locked());
        }

        debug!(preset = %template.id, locked = parts.len(), "Applied preset");
        parts.extend(baseline);
        self.parts = parts;
        self.active_preset = Some(template.id.clone());
    }

    /// Back to a single blank text part with no preset.
    pub fn reset(&mut self) {
        let blank = self.blank_text();
        self.parts = vec![blank];
        self.active_preset = None;
    }

    /// Replace the whole sequence with parts produced by the generation
    /// service.
    ///
    /// Entries without a type or value become `fallback_text`; operator
    /// entries whose id is not in `catalog` degrade to plain text.
    pub fn import_generated(&mut self, raw: &[RawPart], catalog: &Catalog, fallback_text: &str) {
        let mut parts = Vec::with_capacity(raw.len().max(1));

        for entry in raw {
            let (Some(kind), Some(value)) = (entry.kind.as_deref(), entry.value.as_deref()) else {
                parts.push(QueryPart::text(self.ids.next_id("ai-fallback"), fallback_text));
                continue;
            };
            if kind.is_empty() || value.is_empty() {
                parts.push(QueryPart::text(self.ids.next_id("ai-fallback"), fallback_text));
                continue;
            }

            let operator = match kind {
                "operator" => entry.operator_id.as_deref().and_then(|id| catalog.get(id)),
                _ => None,
            };

            match operator {
                Some(op) => {
                    let id = self.ids.next_id(&format!("ai-op-{}", op.id));
                    parts.push(QueryPart::operator(id, Arc::clone(op), value));
                }
                None => {
                    if kind == "operator" {
                        debug!(operator = ?entry.operator_id, "Unknown generated operator, keeping as text");
                    }
                    parts.push(QueryPart::text(self.ids.next_id("ai-text"), value));
                }
            }
        }

        debug!(parts = parts.len(), "Imported generated parts");
        self.parts = parts;
        self.active_preset = None;
        self.ensure_editable();
    }

    // === Serialization ===

    /// Render the query string.
    ///
    /// Each part becomes one token: trimmed text, a quoted exact phrase, an
    /// operator token glued to its trimmed argument, or a bare operator
    /// token. Empty tokens are dropped and the rest joined by single spaces.
    /// An exact phrase with a blank value still renders as `""`.
    pub fn serialize(&self) -> String {
        self.parts
            .iter()
            .map(serialize_part)
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    // === Helpers ===

    fn blank_text(&mut self) -> QueryPart {
        QueryPart::text(self.ids.next_id("text"), "")
    }

    fn editable_is_single_blank(&self) -> bool {
        let mut editable = self.editable_parts();
        matches!((editable.next(), editable.next()), (Some(p), None) if p.is_blank_text())
    }

    fn ensure_editable(&mut self) {
        if self.editable_parts().next().is_none() {
            let blank = self.blank_text();
            self.parts.push(blank);
        }
    }
}

fn serialize_part(part: &QueryPart) -> String {
    match &part.kind {
        PartKind::Text => part.value.trim().to_string(),
        PartKind::Operator(op) if op.is_exact_phrase() => format!("\"{}\"", part.value.trim()),
        PartKind::Operator(op) if op.takes_value => format!("{}{}", op.token, part.value.trim()),
        PartKind::Operator(op) => op.token.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::types::{OperatorCategory, TemplatePart};

    fn test_catalog() -> Catalog {
        Catalog::new(vec![
            Operator::new("site", "site:", true, OperatorCategory::Location),
            Operator::new("or", "OR", false, OperatorCategory::Basic),
            Operator::new("exact_term", "\"", true, OperatorCategory::Basic),
            Operator::new("exclude", "-", true, OperatorCategory::Basic),
            Operator::new("filetype", "filetype:", true, OperatorCategory::Location),
        ])
        .unwrap()
    }

    fn test_templates() -> Vec<PresetTemplate> {
        vec![
            PresetTemplate {
                id: "a".to_string(),
                name: "A".to_string(),
                description: String::new(),
                parts: vec![
                    TemplatePart::new("site", "edu"),
                    TemplatePart::new("or", "ignored"),
                    TemplatePart::new("missing", "dropped"),
                ],
            },
            PresetTemplate {
                id: "b".to_string(),
                name: "B".to_string(),
                description: String::new(),
                parts: vec![TemplatePart::new("filetype", "pdf")],
            },
        ]
    }

    fn composer() -> Composer {
        Composer::new(SequentialIds::new())
    }

    fn editable_len(c: &Composer) -> usize {
        c.editable_parts().count()
    }

    fn assert_locked_prefix(c: &Composer) {
        let first_unlocked = c.parts().iter().position(|p| !p.locked).unwrap();
        assert!(c.parts()[first_unlocked..].iter().all(|p| !p.locked));
    }

    #[test]
    fn test_new_has_single_blank() {
        let c = composer();
        assert_eq!(c.len(), 1);
        assert!(c.parts()[0].is_blank_text());
        assert!(c.active_preset().is_none());
        assert_eq!(c.serialize(), "");
    }

    #[test]
    fn test_scenario_basic_build() {
        let catalog = test_catalog();
        let mut c = composer();

        c.append_operator(catalog.get("site").unwrap());
        assert_eq!(c.len(), 1);
        let site_part = &c.parts()[0];
        assert_eq!(site_part.operator_id(), Some("site"));
        assert_eq!(site_part.value, "");
        let site_id = site_part.id.clone();

        c.update_value(&site_id, "example.com");
        c.append_text();
        let text_id = c.parts()[1].id.clone();
        c.update_value(&text_id, "cats");

        assert_eq!(c.serialize(), "site:example.com cats");
    }

    #[test]
    fn test_scenario_non_value_operator() {
        let catalog = test_catalog();
        let mut c = composer();
        let id = c.parts()[0].id.clone();
        c.update_value(&id, "cats");

        c.append_operator(catalog.get("or").unwrap());

        assert_eq!(c.len(), 3);
        assert_eq!(c.parts()[0].id, id);
        assert_eq!(c.parts()[0].value, "cats");
        assert_eq!(c.parts()[1].operator_id(), Some("or"));
        assert_eq!(c.parts()[1].value, "OR");
        assert!(c.parts()[2].is_blank_text());
        assert_eq!(c.serialize(), "cats OR");
    }

    #[test]
    fn test_scenario_remove_last_editable() {
        let mut c = composer();
        let id = c.parts()[0].id.clone();
        c.update_value(&id, "cats");

        c.remove(&id);

        assert_eq!(c.len(), 1);
        assert!(c.parts()[0].is_blank_text());
        assert_ne!(c.parts()[0].id, id);
        assert_eq!(c.serialize(), "");
    }

    #[test]
    fn test_scenario_import_unknown_operator() {
        let catalog = test_catalog();
        let mut c = composer();

        c.import_generated(&[RawPart::operator("nonexistent", "x")], &catalog, "fallback");

        assert_eq!(c.len(), 1);
        assert!(c.parts()[0].is_text());
        assert_eq!(c.parts()[0].value, "x");
    }

    #[test]
    fn test_transform_text_into_value_operator() {
        let catalog = test_catalog();
        let mut c = composer();
        let id = c.parts()[0].id.clone();
        c.update_value(&id, "example.com");

        c.append_operator(catalog.get("site").unwrap());

        assert_eq!(c.len(), 1);
        assert_eq!(c.parts()[0].id, id);
        assert_eq!(c.parts()[0].operator_id(), Some("site"));
        assert_eq!(c.serialize(), "site:example.com");
    }

    #[test]
    fn test_locked_text_never_transformed() {
        let catalog = test_catalog();
        let locked = QueryPart::text(PartId::from("locked-1"), "kept").into_locked();
        let mut c = Composer::from_parts(vec![locked], SequentialIds::new());
        // from_parts adds an editable blank after the locked text; remove it so
        // the locked part is last.
        let blank = c.parts()[1].id.clone();
        c.parts.retain(|p| p.id != blank);

        c.append_operator(catalog.get("site").unwrap());

        assert!(c.parts()[0].is_text());
        assert_eq!(c.parts()[0].value, "kept");
        assert_eq!(c.parts()[1].operator_id(), Some("site"));
    }

    #[test]
    fn test_append_operator_after_nonblank_appends() {
        let catalog = test_catalog();
        let mut c = composer();
        let id = c.parts()[0].id.clone();
        c.update_value(&id, "cats");
        c.append_operator(catalog.get("or").unwrap());

        // Last part is blank text now, so a value operator is appended after it
        c.append_operator(catalog.get("site").unwrap());

        assert_eq!(c.len(), 4);
        assert!(c.parts()[2].is_blank_text());
        assert_eq!(c.parts()[3].operator_id(), Some("site"));
    }

    #[test]
    fn test_append_operator_twice_distinct_parts() {
        let catalog = test_catalog();
        let mut c = composer();
        let site = catalog.get("site").unwrap();

        c.append_operator(site);
        c.append_operator(site);

        assert_eq!(c.len(), 2);
        assert_ne!(c.parts()[0].id, c.parts()[1].id);
        assert!(c.parts().iter().all(|p| p.operator_id() == Some("site")));
    }

    #[test]
    fn test_append_operator_replaces_blank_after_locked() {
        let catalog = test_catalog();
        let templates = test_templates();
        let mut c = composer();
        c.apply_template(Some("b"), &templates, &catalog);
        assert_eq!(c.len(), 2);

        c.append_operator(catalog.get("exclude").unwrap());

        assert_eq!(c.len(), 2);
        assert!(c.parts()[0].locked);
        assert_eq!(c.parts()[1].operator_id(), Some("exclude"));
        assert!(!c.parts()[1].locked);
    }

    #[test]
    fn test_append_text() {
        let mut c = composer();
        c.append_text();
        c.append_text();
        assert_eq!(c.len(), 3);
        assert!(c.parts().iter().all(|p| p.is_blank_text()));
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut c = composer();
        let before = c.parts().to_vec();
        c.update_value(&PartId::from("nope"), "x");
        assert_eq!(c.parts(), &before[..]);
    }

    #[test]
    fn test_fixed_operator_value_not_editable() {
        let catalog = test_catalog();
        let mut c = composer();
        let text_id = c.parts()[0].id.clone();
        c.update_value(&text_id, "cats");
        c.append_operator(catalog.get("or").unwrap());
        let or_id = c.parts()[1].id.clone();

        c.update_value(&or_id, "garbage");
        assert_eq!(c.parts()[1].value, "OR");
        assert_eq!(c.serialize(), "cats OR");
    }

    #[test]
    fn test_relink_operators() {
        let catalog = test_catalog();
        let mut c = composer();
        c.append_operator(catalog.get("site").unwrap());
        let site_id = c.parts()[0].id.clone();
        c.update_value(&site_id, "example.com");

        let relabeled = Catalog::new(vec![Operator::new(
            "site",
            "site:",
            true,
            OperatorCategory::Location,
        )
        .with_description("sitede ara")])
        .unwrap();
        c.relink_operators(&relabeled);

        let part = c.get(&site_id).unwrap();
        assert_eq!(part.value, "example.com");
        assert_eq!(part.kind.operator().unwrap().description, "sitede ara");
        assert_eq!(c.serialize(), "site:example.com");
    }

    #[test]
    fn test_locked_immutability() {
        let catalog = test_catalog();
        let templates = test_templates();
        let mut c = composer();
        c.apply_template(Some("a"), &templates, &catalog);
        let locked: Vec<QueryPart> = c.locked_parts().cloned().collect();
        assert_eq!(locked.len(), 2);

        for part in &locked {
            c.update_value(&part.id, "changed");
            c.remove(&part.id);
        }

        let after: Vec<QueryPart> = c.locked_parts().cloned().collect();
        assert_eq!(after, locked);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut c = composer();
        c.append_text();
        c.remove(&PartId::from("nope"));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_remove_keeps_locked_prefix() {
        let catalog = test_catalog();
        let templates = test_templates();
        let mut c = composer();
        c.apply_template(Some("b"), &templates, &catalog);
        let editable = c.parts()[1].id.clone();

        c.remove(&editable);

        assert_eq!(c.len(), 2);
        assert!(c.parts()[0].locked);
        assert!(c.parts()[1].is_blank_text());
        assert_ne!(c.parts()[1].id, editable);
    }

    #[test]
    fn test_apply_template_materializes() {
        let catalog = test_catalog();
        let templates = test_templates();
        let mut c = composer();

        c.apply_template(Some("a"), &templates, &catalog);

        assert_eq!(c.active_preset(), Some("a"));
        let locked: Vec<&QueryPart> = c.locked_parts().collect();
        assert_eq!(locked.len(), 2);
        assert_eq!(locked[0].value, "edu");
        // Fixed operators carry their token, not the template value
        assert_eq!(locked[1].value, "OR");
        assert_eq!(editable_len(&c), 1);
        assert_eq!(c.serialize(), "site:edu OR");
    }

    #[test]
    fn test_template_replace_semantics() {
        let catalog = test_catalog();
        let templates = test_templates();
        let mut c = composer();
        let id = c.parts()[0].id.clone();
        c.update_value(&id, "rust");

        c.apply_template(Some("a"), &templates, &catalog);
        c.apply_template(Some("b"), &templates, &catalog);

        let locked: Vec<&QueryPart> = c.locked_parts().collect();
        assert_eq!(locked.len(), 1);
        assert_eq!(locked[0].operator_id(), Some("filetype"));
        assert_eq!(c.active_preset(), Some("b"));
        // User parts survive untouched
        assert_eq!(c.parts()[1].id, id);
        assert_eq!(c.serialize(), "filetype:pdf rust");
    }

    #[test]
    fn test_apply_template_clear_and_unknown() {
        let catalog = test_catalog();
        let templates = test_templates();
        let mut c = composer();
        c.apply_template(Some("a"), &templates, &catalog);

        c.apply_template(None, &templates, &catalog);
        assert!(c.active_preset().is_none());
        assert_eq!(c.locked_parts().count(), 0);
        assert_eq!(c.len(), 1);

        c.apply_template(Some("a"), &templates, &catalog);
        c.apply_template(Some("zzz"), &templates, &catalog);
        assert!(c.active_preset().is_none());
        assert_eq!(c.locked_parts().count(), 0);
    }

    #[test]
    fn test_apply_template_normalizes_single_blank() {
        let catalog = test_catalog();
        let templates = test_templates();
        let mut c = composer();
        let original = c.parts()[0].id.clone();

        c.apply_template(Some("b"), &templates, &catalog);

        assert!(c.parts()[1].is_blank_text());
        assert_ne!(c.parts()[1].id, original);
    }

    #[test]
    fn test_reset() {
        let catalog = test_catalog();
        let templates = test_templates();
        let mut c = composer();
        c.apply_template(Some("a"), &templates, &catalog);
        c.append_text();

        c.reset();

        assert_eq!(c.len(), 1);
        assert!(c.parts()[0].is_blank_text());
        assert!(c.active_preset().is_none());
    }

    #[test]
    fn test_exact_phrase_wrapping() {
        let catalog = test_catalog();
        let mut c = composer();
        let id = c.parts()[0].id.clone();
        c.update_value(&id, "cats");
        c.append_operator(catalog.get("or").unwrap());
        c.append_operator(catalog.get("exact_term").unwrap());
        let phrase = c.parts().last().unwrap().id.clone();
        c.update_value(&phrase, "  foo bar ");

        assert_eq!(c.serialize(), "cats OR \"foo bar\"");
    }

    #[test]
    fn test_exact_phrase_blank_keeps_quotes() {
        let catalog = test_catalog();
        let mut c = composer();
        c.append_operator(catalog.get("exact_term").unwrap());
        assert_eq!(c.serialize(), "\"\"");
    }

    #[test]
    fn test_value_operator_concatenation() {
        let catalog = test_catalog();
        let mut c = composer();
        c.append_operator(catalog.get("site").unwrap());
        let id = c.parts()[0].id.clone();
        c.update_value(&id, " example.com ");
        assert_eq!(c.serialize(), "site:example.com");
    }

    #[test]
    fn test_serialize_skips_blank_text_and_is_deterministic() {
        let catalog = test_catalog();
        let mut c = composer();
        c.append_text();
        c.append_operator(catalog.get("exclude").unwrap());
        let id = c.parts().last().unwrap().id.clone();
        c.update_value(&id, "ads");

        let first = c.serialize();
        assert_eq!(first, "-ads");
        assert_eq!(c.serialize(), first);
    }

    #[test]
    fn test_import_generated_mapping() {
        let catalog = test_catalog();
        let templates = test_templates();
        let mut c = composer();
        c.apply_template(Some("a"), &templates, &catalog);

        c.import_generated(
            &[
                RawPart::text("swot analysis"),
                RawPart::operator("site", "harvard.edu"),
                RawPart::default(),
                RawPart {
                    kind: Some("operator".to_string()),
                    value: Some("lonely".to_string()),
                    operator_id: None,
                },
                RawPart::text(""),
                RawPart {
                    kind: Some("foo".to_string()),
                    value: Some("bar".to_string()),
                    operator_id: Some("site".to_string()),
                },
            ],
            &catalog,
            "the prompt",
        );

        assert!(c.active_preset().is_none());
        assert_eq!(c.locked_parts().count(), 0);
        let values: Vec<&str> = c.parts().iter().map(|p| p.value.as_str()).collect();
        assert_eq!(
            values,
            vec!["swot analysis", "harvard.edu", "the prompt", "lonely", "the prompt", "bar"]
        );
        assert_eq!(c.parts()[1].operator_id(), Some("site"));
        assert!(c.parts()[3].is_text());
        assert!(c.parts()[5].is_text());
        assert_eq!(
            c.serialize(),
            "swot analysis site:harvard.edu the prompt lonely the prompt bar"
        );
    }

    #[test]
    fn test_import_empty_keeps_invariant() {
        let catalog = test_catalog();
        let mut c = composer();
        c.import_generated(&[], &catalog, "fallback");
        assert_eq!(c.len(), 1);
        assert!(c.parts()[0].is_blank_text());
    }

    #[test]
    fn test_from_parts_orders_and_ensures() {
        let catalog = test_catalog();
        let site = Arc::clone(catalog.get("site").unwrap());
        let parts = vec![
            QueryPart::text(PartId::from("t"), "x"),
            QueryPart::operator(PartId::from("l"), site, "edu").into_locked(),
        ];
        let c = Composer::from_parts(parts, SequentialIds::new());
        assert!(c.parts()[0].locked);
        assert_eq!(c.parts()[1].id.as_str(), "t");

        let c = Composer::from_parts(Vec::new(), SequentialIds::new());
        assert_eq!(c.len(), 1);
        assert!(c.parts()[0].is_blank_text());
    }

    #[test]
    fn test_editable_never_empty_under_random_operations() {
        let catalog = test_catalog();
        let templates = test_templates();
        let preset_ids = [Some("a"), Some("b"), None, Some("unknown")];
        let mut c = composer();

        // Small LCG so the sequence is reproducible without extra crates
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (seed >> 33) as usize
        };

        for _ in 0..2_000 {
            match next() % 5 {
                0 | 1 => {
                    let idx = next() % c.len();
                    let id = c.parts()[idx].id.clone();
                    c.remove(&id);
                }
                2 => c.apply_template(preset_ids[next() % preset_ids.len()], &templates, &catalog),
                3 => {
                    let ops: Vec<_> = catalog.iter().cloned().collect();
                    c.append_operator(&ops[next() % ops.len()]);
                }
                _ => {
                    let idx = next() % c.len();
                    let id = c.parts()[idx].id.clone();
                    c.update_value(&id, if next() % 2 == 0 { "" } else { "word" });
                }
            }
            assert!(editable_len(&c) >= 1);
            assert_locked_prefix(&c);
        }
    }
}
