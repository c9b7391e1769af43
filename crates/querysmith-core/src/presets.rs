//! Preset templates ("manifestos").
//!
//! A preset is a reusable search strategy: an ordered list of operator
//! entries that the composer injects as a locked prefix.

use crate::error::{QuerysmithError, Result};
use crate::locale::Language;
use crate::types::{PresetTemplate, TemplatePart};

/// The set of presets available to the user.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    templates: Vec<PresetTemplate>,
}

impl PresetLibrary {
    pub fn new(templates: Vec<PresetTemplate>) -> Self {
        PresetLibrary { templates }
    }

    /// Built-in presets with names and descriptions in `language`.
    pub fn builtin(language: Language) -> Self {
        let (scientific_name, scientific_desc, ethical_name, ethical_desc) = match language {
            Language::En => (
                "Scientific Priority",
                "Prioritizes academic and official sources (.edu, .gov) and PDF files.",
                "Ethical & Focused",
                "Excludes major social media platforms to focus on direct sources.",
            ),
            Language::Tr => (
                "Bilimsel Öncelik",
                "Akademik ve resmi kaynakları (.edu, .gov) ve PDF dosyalarını önceliklendirir.",
                "Etik & Odaklı",
                "Doğrudan kaynaklara odaklanmak için büyük sosyal medya platformlarını hariç tutar.",
            ),
        };

        PresetLibrary {
            templates: vec![
                PresetTemplate {
                    id: "scientific".to_string(),
                    name: scientific_name.to_string(),
                    description: scientific_desc.to_string(),
                    parts: vec![
                        TemplatePart::new("site", "edu"),
                        TemplatePart::new("or", "OR"),
                        TemplatePart::new("site", "gov"),
                        TemplatePart::new("filetype", "pdf"),
                    ],
                },
                PresetTemplate {
                    id: "ethical".to_string(),
                    name: ethical_name.to_string(),
                    description: ethical_desc.to_string(),
                    parts: vec![
                        TemplatePart::new("exclude", "site:facebook.com"),
                        TemplatePart::new("exclude", "site:twitter.com"),
                        TemplatePart::new("exclude", "site:pinterest.com"),
                    ],
                },
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&PresetTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&PresetTemplate> {
        self.get(id)
            .ok_or_else(|| QuerysmithError::UnknownPreset { id: id.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresetTemplate> {
        self.templates.iter()
    }

    pub fn as_slice(&self) -> &[PresetTemplate] {
        &self.templates
    }

    /// The preset after `current` in display order; `None` wraps around to
    /// "no preset".
    pub fn next_after(&self, current: Option<&str>) -> Option<&PresetTemplate> {
        match current {
            None => self.templates.first(),
            Some(id) => {
                let pos = self.templates.iter().position(|t| t.id == id)?;
                self.templates.get(pos + 1)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
