//! Attribute picking over provider-varying schemas.
//!
//! Different WBD layers and mirrors spell their fields differently
//! (`HUC12`, `huc_12`, `Name`, `GNIS_NAME`, ...), so fields are located by
//! ordered match rules rather than fixed names.

use serde_json::{Map, Value};

use crate::models::LookupLevel;

/// Pick the HUC code: an exact `huc<level>`/`huc_<level>` key, else the first
/// key containing "huc". `None` when nothing matches or the value is empty.
pub fn extract_code(attributes: &Map<String, Value>, level: &LookupLevel) -> Option<String> {
    let exact = [format!("huc{}", level), format!("huc_{}", level)];

    let key = find_key(attributes, &exact).or_else(|| {
        attributes
            .keys()
            .find(|k| k.to_lowercase().contains("huc"))
            .map(String::as_str)
    })?;

    attributes
        .get(key)
        .map(value_to_string)
        .filter(|code| !code.is_empty())
}

/// Pick a display name from the usual spellings. No substring fallback.
pub fn extract_name(attributes: &Map<String, Value>, level: &LookupLevel) -> Option<String> {
    let candidates = name_candidates(level);
    let key = find_key(attributes, &candidates)?;

    attributes
        .get(key)
        .map(value_to_string)
        .filter(|name| !name.is_empty())
}

fn name_candidates(level: &LookupLevel) -> [String; 6] {
    [
        "name".to_string(),
        format!("huc{}_name", level),
        format!("huc{}name", level),
        "gnis_name".to_string(),
        "gnisname".to_string(),
        "huc_name".to_string(),
    ]
}

/// First candidate (in candidate order) present in `attributes`, ignoring case
fn find_key<'a>(attributes: &'a Map<String, Value>, candidates: &[String]) -> Option<&'a str> {
    candidates.iter().find_map(|candidate| {
        attributes
            .keys()
            .find(|k| k.eq_ignore_ascii_case(candidate))
            .map(String::as_str)
    })
}

/// Render an attribute as text: strings verbatim, null as empty, anything
/// else as its JSON form.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
