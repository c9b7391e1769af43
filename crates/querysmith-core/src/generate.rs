//! Request building and response parsing for natural-language generation.
//!
//! This module is transport-agnostic: it builds the chat-completions request
//! body and turns the model's free-form reply into [`RawPart`]s. The HTTP
//! side lives in the `querysmith-generator` crate.
//!
//! Model output is untrusted. [`parse_response`] never fails; anything it
//! cannot read as a JSON array becomes [`GeneratedResponse::Malformed`], which
//! degrades to a single text part holding the original prompt.

use crate::catalog::Catalog;
use crate::types::RawPart;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Instruction sent as the system message.
pub const SYSTEM_INSTRUCTION: &str = r#"You turn a user's description of what they are looking for into a structured web search query.

Break the request into meaningful search terms and use the available operators where they make the query more precise. Do not copy the request word for word.

Reply with a JSON array and nothing else. Each element has this shape:
{"type": "text" | "operator", "value": "string", "operatorId": "string (operator elements only)"}

Rules:
- Text elements: "type" is "text" and "value" is a search term.
- Operator elements: "type" is "operator", "operatorId" is the id of one of the available operators and "value" is its argument.
- Use exact_term for phrases that must match exactly, exclude for unwanted terms, intitle for words expected in the title and site to restrict to a domain.
- Terms are combined with an implicit AND unless an explicit operator says otherwise.

Example request: "marketing site:harvard.edu"
Example reply: [{"type": "text", "value": "marketing"}, {"type": "operator", "value": "harvard.edu", "operatorId": "site"}]"#;

/// Outcome of reading a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedResponse {
    /// The reply contained a JSON array of parts
    Parsed(Vec<RawPart>),
    /// The reply could not be read as parts
    Malformed,
}

impl GeneratedResponse {
    /// The parts to import; a malformed reply becomes the prompt as text.
    pub fn into_parts(self, prompt: &str) -> Vec<RawPart> {
        match self {
            GeneratedResponse::Parsed(parts) => parts,
            GeneratedResponse::Malformed => vec![RawPart::text(prompt)],
        }
    }
}

/// Read a model reply into parts.
///
/// The reply must be valid JSON. A bare array is taken as is; any other JSON
/// value (usually an object wrapping the array) is searched for its
/// outermost `[...]` span. Anything else is malformed.
pub fn parse_response(text: &str) -> GeneratedResponse {
    let text = text.trim();

    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Model reply is not valid JSON");
            return GeneratedResponse::Malformed;
        }
    };

    if let Value::Array(items) = value {
        return GeneratedResponse::Parsed(to_raw_parts(items));
    }

    let Some(span) = array_span_regex().find(text) else {
        warn!("Model reply contains no JSON array");
        return GeneratedResponse::Malformed;
    };

    match serde_json::from_str::<Value>(span.as_str()) {
        Ok(Value::Array(items)) => GeneratedResponse::Parsed(to_raw_parts(items)),
        _ => {
            warn!("Model reply contains an unreadable JSON array");
            GeneratedResponse::Malformed
        }
    }
}

/// Explicit operators typed into the prompt (`site:`, `intitle:`, `-term`),
/// split out from the surrounding text in order.
pub fn prompt_hints(prompt: &str) -> Vec<RawPart> {
    let mut hints = Vec::new();
    let mut last = 0;

    for caps in operator_hint_regex().captures_iter(prompt) {
        let (Some(whole), Some(prefix), Some(value)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        let before = prompt[last..whole.start()].trim();
        if !before.is_empty() {
            hints.push(RawPart::text(before));
        }

        let operator_id = match prefix.as_str() {
            "-" => "exclude",
            "intitle:" => "intitle",
            _ => "site",
        };
        hints.push(RawPart::operator(operator_id, value.as_str()));
        last = whole.end();
    }

    let rest = prompt[last..].trim();
    if !rest.is_empty() {
        hints.push(RawPart::text(rest));
    }

    hints
}

/// Build the chat-completions request body for `prompt`.
pub fn build_request(model: &str, prompt: &str, catalog: &Catalog) -> Value {
    let operators: Vec<Value> = catalog
        .iter()
        .map(|op| {
            json!({
                "id": op.id,
                "operator": op.token,
                "description": op.description,
                "takesValue": op.takes_value,
            })
        })
        .collect();
    let operators = serde_json::to_string_pretty(&operators).unwrap_or_default();

    let mut user_message = format!(
        "Convert this request into a structured search query using the available operators.\n\n\
         User request: \"{}\"\n\n\
         Available operators: {}\n",
        prompt, operators
    );

    let hints = prompt_hints(prompt);
    if hints.iter().any(|h| h.operator_id.is_some()) {
        debug!(hints = hints.len(), "Prompt contains explicit operators");
        let hints = serde_json::to_string(&hints).unwrap_or_default();
        user_message.push_str(&format!(
            "\nThe request already uses these operators, keep them: {}\n",
            hints
        ));
    }
    user_message.push_str("\nReturn only the JSON array.");

    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_INSTRUCTION },
            { "role": "user", "content": user_message },
        ],
        "response_format": { "type": "json_object" },
    })
}

fn to_raw_parts(items: Vec<Value>) -> Vec<RawPart> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect()
}

fn array_span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"))
}

fn operator_hint_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(intitle:|site:|-)(\S+)").expect("valid regex"))
}
