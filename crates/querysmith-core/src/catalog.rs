//! The operator catalog.
//!
//! A catalog is an ordered, read-only list of operators with unique ids.
//! Operators are stored behind `Arc` so query parts can reference them
//! without copying. The built-in catalog covers the common Google operators,
//! with descriptions in every supported language.

use crate::error::{QuerysmithError, Result};
use crate::locale::Language;
use crate::types::{Operator, OperatorCategory};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Ordered collection of operators, looked up by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    operators: Vec<Arc<Operator>>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(operators: Vec<Operator>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(operators.len());
        for (i, op) in operators.iter().enumerate() {
            if by_id.insert(op.id.clone(), i).is_some() {
                return Err(QuerysmithError::DuplicateOperator { id: op.id.clone() });
            }
        }

        Ok(Catalog {
            operators: operators.into_iter().map(Arc::new).collect(),
            by_id,
        })
    }

    /// The built-in catalog with descriptions in `language`.
    pub fn builtin(language: Language) -> Self {
        let operators = BUILTIN_OPERATORS
            .iter()
            .map(|def| {
                let description = match language {
                    Language::En => def.description_en,
                    Language::Tr => def.description_tr,
                };
                Operator::new(def.id, def.token, def.takes_value, def.category)
                    .with_description(description)
                    .with_example(def.example)
            })
            .collect();

        Catalog::new(operators).unwrap_or_else(|e| {
            warn!(error = %e, "Built-in operator table is invalid");
            Catalog::default()
        })
    }

    /// Look up an operator by id
    pub fn get(&self, id: &str) -> Option<&Arc<Operator>> {
        self.by_id.get(id).map(|&i| &self.operators[i])
    }

    /// Look up an operator by id, failing if absent
    pub fn require(&self, id: &str) -> Result<&Arc<Operator>> {
        self.get(id)
            .ok_or_else(|| QuerysmithError::UnknownOperator { id: id.to_string() })
    }

    /// Iterate operators in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Operator>> {
        self.operators.iter()
    }

    /// Operators in one category, or all of them for `None`
    pub fn in_category(&self, category: Option<OperatorCategory>) -> Vec<&Arc<Operator>> {
        self.operators
            .iter()
            .filter(|op| category.map_or(true, |c| op.category == c))
            .collect()
    }

    /// Categories that have at least one operator, in display order
    pub fn categories(&self) -> Vec<OperatorCategory> {
        OperatorCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.operators.iter().any(|op| op.category == *c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

struct OperatorDef {
    id: &'static str,
    token: &'static str,
    takes_value: bool,
    category: OperatorCategory,
    example: &'static str,
    description_en: &'static str,
    description_tr: &'static str,
}

const BUILTIN_OPERATORS: &[OperatorDef] = &[
    OperatorDef {
        id: "exact_term",
        token: "\"",
        takes_value: true,
        category: OperatorCategory::Basic,
        example: "climate change report",
        description_en: "Match the exact phrase in this order.",
        description_tr: "İfadeyi birebir ve bu sırayla arar.",
    },
    OperatorDef {
        id: "exclude",
        token: "-",
        takes_value: true,
        category: OperatorCategory::Basic,
        example: "ads",
        description_en: "Exclude results containing the term.",
        description_tr: "Terimi içeren sonuçları hariç tutar.",
    },
    OperatorDef {
        id: "or",
        token: "OR",
        takes_value: false,
        category: OperatorCategory::Basic,
        example: "",
        description_en: "Match either the term before or the term after.",
        description_tr: "Önceki veya sonraki terimden birini arar.",
    },
    OperatorDef {
        id: "and",
        token: "AND",
        takes_value: false,
        category: OperatorCategory::Basic,
        example: "",
        description_en: "Require both the term before and the term after.",
        description_tr: "Önceki ve sonraki terimin ikisini de gerektirir.",
    },
    OperatorDef {
        id: "wildcard",
        token: "*",
        takes_value: false,
        category: OperatorCategory::Basic,
        example: "",
        description_en: "Placeholder for any word.",
        description_tr: "Herhangi bir kelimenin yerini tutar.",
    },
    OperatorDef {
        id: "intitle",
        token: "intitle:",
        takes_value: true,
        category: OperatorCategory::Content,
        example: "roadmap",
        description_en: "The page title contains the word.",
        description_tr: "Sayfa başlığı kelimeyi içerir.",
    },
    OperatorDef {
        id: "allintitle",
        token: "allintitle:",
        takes_value: true,
        category: OperatorCategory::Content,
        example: "rust async runtime",
        description_en: "The page title contains all the words.",
        description_tr: "Sayfa başlığı tüm kelimeleri içerir.",
    },
    OperatorDef {
        id: "intext",
        token: "intext:",
        takes_value: true,
        category: OperatorCategory::Content,
        example: "benchmark",
        description_en: "The page body contains the word.",
        description_tr: "Sayfa metni kelimeyi içerir.",
    },
    OperatorDef {
        id: "allintext",
        token: "allintext:",
        takes_value: true,
        category: OperatorCategory::Content,
        example: "open source license",
        description_en: "The page body contains all the words.",
        description_tr: "Sayfa metni tüm kelimeleri içerir.",
    },
    OperatorDef {
        id: "define",
        token: "define:",
        takes_value: true,
        category: OperatorCategory::Content,
        example: "entropy",
        description_en: "Show a definition of the word.",
        description_tr: "Kelimenin tanımını gösterir.",
    },
    OperatorDef {
        id: "site",
        token: "site:",
        takes_value: true,
        category: OperatorCategory::Location,
        example: "example.com",
        description_en: "Only results from this site or domain.",
        description_tr: "Yalnızca bu site veya alan adından sonuçlar.",
    },
    OperatorDef {
        id: "inurl",
        token: "inurl:",
        takes_value: true,
        category: OperatorCategory::Location,
        example: "docs",
        description_en: "The URL contains the word.",
        description_tr: "URL kelimeyi içerir.",
    },
    OperatorDef {
        id: "allinurl",
        token: "allinurl:",
        takes_value: true,
        category: OperatorCategory::Location,
        example: "api reference",
        description_en: "The URL contains all the words.",
        description_tr: "URL tüm kelimeleri içerir.",
    },
    OperatorDef {
        id: "filetype",
        token: "filetype:",
        takes_value: true,
        category: OperatorCategory::Location,
        example: "pdf",
        description_en: "Only files of this type.",
        description_tr: "Yalnızca bu türdeki dosyalar.",
    },
    OperatorDef {
        id: "related",
        token: "related:",
        takes_value: true,
        category: OperatorCategory::Location,
        example: "example.com",
        description_en: "Sites similar to this one.",
        description_tr: "Bu siteye benzer siteler.",
    },
    OperatorDef {
        id: "before",
        token: "before:",
        takes_value: true,
        category: OperatorCategory::Time,
        example: "2024-01-01",
        description_en: "Published before the date.",
        description_tr: "Tarihten önce yayımlanmış.",
    },
    OperatorDef {
        id: "after",
        token: "after:",
        takes_value: true,
        category: OperatorCategory::Time,
        example: "2023-06-30",
        description_en: "Published after the date.",
        description_tr: "Tarihten sonra yayımlanmış.",
    },
    OperatorDef {
        id: "cache",
        token: "cache:",
        takes_value: true,
        category: OperatorCategory::Advanced,
        example: "example.com",
        description_en: "The cached copy of a page.",
        description_tr: "Sayfanın önbellekteki kopyası.",
    },
    OperatorDef {
        id: "inanchor",
        token: "inanchor:",
        takes_value: true,
        category: OperatorCategory::Advanced,
        example: "tutorial",
        description_en: "Links pointing to the page use the word.",
        description_tr: "Sayfaya verilen bağlantılar kelimeyi kullanır.",
    },
    OperatorDef {
        id: "source",
        token: "source:",
        takes_value: true,
        category: OperatorCategory::Advanced,
        example: "reuters",
        description_en: "News results from this source.",
        description_tr: "Bu kaynaktan haber sonuçları.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let catalog = Catalog::builtin(Language::En);
        let site = catalog.get("site").unwrap();
        assert_eq!(site.token, "site:");
        assert!(site.takes_value);
        assert!(catalog.get("nonexistent").is_none());
        assert!(catalog.require("nonexistent").is_err());
    }

    #[test]
    fn test_builtin_ids_unique() {
        for language in [Language::En, Language::Tr] {
            let catalog = Catalog::builtin(language);
            assert_eq!(catalog.len(), BUILTIN_OPERATORS.len());
            for def in BUILTIN_OPERATORS {
                assert_eq!(catalog.get(def.id).unwrap().token, def.token);
            }
        }
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = Catalog::new(vec![
            Operator::new("site", "site:", true, OperatorCategory::Location),
            Operator::new("site", "site:", true, OperatorCategory::Location),
        ]);
        assert!(matches!(
            result,
            Err(QuerysmithError::DuplicateOperator { .. })
        ));
    }

    #[test]
    fn test_localized_descriptions() {
        let en = Catalog::builtin(Language::En);
        let tr = Catalog::builtin(Language::Tr);
        assert_eq!(en.len(), tr.len());
        assert_ne!(
            en.get("site").unwrap().description,
            tr.get("site").unwrap().description
        );
        assert_eq!(en.get("site").unwrap().token, tr.get("site").unwrap().token);
    }

    #[test]
    fn test_category_filter() {
        let catalog = Catalog::builtin(Language::En);
        let time = catalog.in_category(Some(OperatorCategory::Time));
        assert!(!time.is_empty());
        assert!(time.iter().all(|op| op.category == OperatorCategory::Time));
        assert_eq!(catalog.in_category(None).len(), catalog.len());
        assert_eq!(catalog.categories(), OperatorCategory::ALL.to_vec());
    }
}
