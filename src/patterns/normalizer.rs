use crate::types::{AppError, PatternKind, PatternResponse, Result, ShortcutResponse, SubclassResponse};
use serde_json::{Map, Value};

/// Property name used when the reply has none.
pub const UNKNOWN_PROPERTY: &str = "UnknownProperty";
/// Class name used when the reply has none.
pub const UNKNOWN_CLASS: &str = "UnknownClass";

/// Parse a cleaned completion into the typed response for `pattern`.
///
/// The text must be a JSON object; anything else is an [`AppError::InvalidJson`]
/// carrying the text verbatim. Missing fields fall back to defaults.
pub fn normalize(pattern: PatternKind, text: &str) -> Result<PatternResponse> {
    let object = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => object,
        _ => {
            return Err(AppError::InvalidJson {
                raw: text.to_string(),
            })
        }
    };

    let explanation = field(&object, "explanation", "");

    Ok(match pattern {
        PatternKind::Shortcut => PatternResponse::Shortcut(ShortcutResponse {
            property_name: field(&object, "property_name", UNKNOWN_PROPERTY),
            explanation,
        }),
        PatternKind::Subclass => PatternResponse::Subclass(SubclassResponse {
            class_name: field(&object, "class_name", UNKNOWN_CLASS),
            explanation,
        }),
    })
}

/// String value of `key`; null or absent gives `default`, other types their JSON text.
fn field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
