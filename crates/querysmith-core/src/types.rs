//! Core data types for Querysmith.
//!
//! - **Operators** are immutable catalog entries shared through `Arc`, so a
//!   query part can point at its operator without owning it.
//! - **Query parts** are the mutable fragments owned by the `Composer`.
//! - **Preset templates** describe a locked prefix of operator parts.
//! - **Raw parts** are the loosely-typed entries produced by the generation
//!   service before they are imported.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Catalog id of the operator that wraps its value in quotes.
pub const EXACT_PHRASE_ID: &str = "exact_term";

/// Identifier of a query part, unique within one sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartId(pub String);

impl PartId {
    /// Create a new part id from a string
    pub fn new(id: impl Into<String>) -> Self {
        PartId(id.into())
    }

    /// Get the part id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartId {
    fn from(s: &str) -> Self {
        PartId(s.to_string())
    }
}

impl From<String> for PartId {
    fn from(s: String) -> Self {
        PartId(s)
    }
}

/// Grouping used by the operator library filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorCategory {
    Basic,
    Content,
    Location,
    Time,
    Advanced,
}

impl OperatorCategory {
    /// All categories in display order
    pub const ALL: [OperatorCategory; 5] = [
        OperatorCategory::Basic,
        OperatorCategory::Content,
        OperatorCategory::Location,
        OperatorCategory::Time,
        OperatorCategory::Advanced,
    ];

    /// Stable machine name, as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorCategory::Basic => "basic",
            OperatorCategory::Content => "content",
            OperatorCategory::Location => "location",
            OperatorCategory::Time => "time",
            OperatorCategory::Advanced => "advanced",
        }
    }
}

impl fmt::Display for OperatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperatorCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperatorCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown operator category: {}", s))
    }
}

/// A search-engine operator definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    /// Unique catalog identifier (e.g. "site")
    pub id: String,

    /// Token written into the query (e.g. "site:")
    pub token: String,

    /// Whether the operator is followed by a user-supplied argument
    pub takes_value: bool,

    pub category: OperatorCategory,

    /// Human-readable explanation, localized
    pub description: String,

    /// Example argument shown as a placeholder
    pub example: String,
}

impl Operator {
    /// Create an operator with empty description and example.
    pub fn new(
        id: impl Into<String>,
        token: impl Into<String>,
        takes_value: bool,
        category: OperatorCategory,
    ) -> Self {
        Operator {
            id: id.into(),
            token: token.into(),
            takes_value,
            category,
            description: String::new(),
            example: String::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the example argument
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    /// True for the operator that quotes its value instead of prefixing it
    pub fn is_exact_phrase(&self) -> bool {
        self.id == EXACT_PHRASE_ID
    }
}

/// What a query part is: free text, or an instance of a catalog operator.
#[derive(Debug, Clone, PartialEq)]
pub enum PartKind {
    Text,
    Operator(Arc<Operator>),
}

impl PartKind {
    /// The referenced operator, if any
    pub fn operator(&self) -> Option<&Arc<Operator>> {
        match self {
            PartKind::Text => None,
            PartKind::Operator(op) => Some(op),
        }
    }
}

/// One fragment of the composed query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPart {
    pub id: PartId,
    pub kind: PartKind,

    /// User text, operator argument, or the fixed operator token
    pub value: String,

    /// Injected by a preset; read-only and not individually removable
    pub locked: bool,
}

impl QueryPart {
    /// An editable text part
    pub fn text(id: PartId, value: impl Into<String>) -> Self {
        QueryPart {
            id,
            kind: PartKind::Text,
            value: value.into(),
            locked: false,
        }
    }

    /// An editable operator part with the given value
    pub fn operator(id: PartId, operator: Arc<Operator>, value: impl Into<String>) -> Self {
        QueryPart {
            id,
            kind: PartKind::Operator(operator),
            value: value.into(),
            locked: false,
        }
    }

    /// Mark this part as locked
    pub fn into_locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, PartKind::Text)
    }

    /// A text part whose trimmed value is empty
    pub fn is_blank_text(&self) -> bool {
        self.is_text() && self.value.trim().is_empty()
    }

    /// Whether a user may change the value: unlocked, and either text or a
    /// value-taking operator.
    pub fn is_value_editable(&self) -> bool {
        if self.locked {
            return false;
        }
        match &self.kind {
            PartKind::Text => true,
            PartKind::Operator(op) => op.takes_value,
        }
    }

    /// The referenced operator id, if any
    pub fn operator_id(&self) -> Option<&str> {
        self.kind.operator().map(|op| op.id.as_str())
    }
}

/// One operator entry of a preset template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePart {
    pub operator_id: String,
    pub value: String,
}

impl TemplatePart {
    pub fn new(operator_id: impl Into<String>, value: impl Into<String>) -> Self {
        TemplatePart {
            operator_id: operator_id.into(),
            value: value.into(),
        }
    }
}

/// A named search strategy injected as a locked prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetTemplate {
    pub id: String,

    /// Localized display name
    pub name: String,

    /// Localized description
    pub description: String,

    pub parts: Vec<TemplatePart>,
}

/// A part as described by the generation service, before validation.
///
/// Every field is optional: the model output is untrusted and the import
/// step decides how to degrade incomplete entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPart {
    /// "text" or "operator"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "operatorId", default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
}

impl RawPart {
    /// A text entry
    pub fn text(value: impl Into<String>) -> Self {
        RawPart {
            kind: Some("text".to_string()),
            value: Some(value.into()),
            operator_id: None,
        }
    }

    /// An operator entry
    pub fn operator(operator_id: impl Into<String>, value: impl Into<String>) -> Self {
        RawPart {
            kind: Some("operator".to_string()),
            value: Some(value.into()),
            operator_id: Some(operator_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_id() {
        let a = PartId::new("text-1");
        let b = PartId::from("text-1");
        assert_eq!(a, b);
        assert_eq!(format!("{}", a), "text-1");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "Location".parse::<OperatorCategory>().unwrap(),
            OperatorCategory::Location
        );
        assert!("nowhere".parse::<OperatorCategory>().is_err());
    }

    #[test]
    fn test_value_editable() {
        let site = Arc::new(Operator::new("site", "site:", true, OperatorCategory::Location));
        let or = Arc::new(Operator::new("or", "OR", false, OperatorCategory::Basic));

        assert!(QueryPart::text(PartId::from("t"), "").is_value_editable());
        assert!(QueryPart::operator(PartId::from("s"), site.clone(), "").is_value_editable());
        assert!(!QueryPart::operator(PartId::from("o"), or, "OR").is_value_editable());
        assert!(!QueryPart::operator(PartId::from("l"), site, "edu")
            .into_locked()
            .is_value_editable());
    }

    #[test]
    fn test_raw_part_serde_names() {
        let raw: RawPart =
            serde_json::from_str(r#"{"type":"operator","value":"x","operatorId":"site"}"#).unwrap();
        assert_eq!(raw, RawPart::operator("site", "x"));

        let raw: RawPart = serde_json::from_str(r#"{"value":"only"}"#).unwrap();
        assert!(raw.kind.is_none());
        assert_eq!(raw.value.as_deref(), Some("only"));
    }
}
