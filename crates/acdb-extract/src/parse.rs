//! Interpretation of the model's JSON reply as a [`CodeRecord`].

use acdb_core::{AreaCode, CodeRecord, ExtractedFacts, NO_INFORMATION_REASON};
use serde_json::{Map, Value};

use crate::error::MalformedResponse;

pub const NOT_AN_OBJECT_REASON: &str = "extraction response was not a JSON object";
pub const MISSING_GROUPS_REASON: &str =
    "extraction response lacked general_information or geographic_information";

const GENERAL_GROUP: &str = "general_information";
const GEOGRAPHIC_GROUP: &str = "geographic_information";

/// Parses one raw completion into a record for `code`.
///
/// A surrounding markdown code fence is tolerated. Valid JSON that is not an
/// object, is empty, or lacks either field group yields an empty record; the
/// model's own `reason` string is used when it supplied one.
///
/// # Errors
///
/// Returns [`MalformedResponse`] if the text is not valid JSON.
pub fn parse_extraction_response(
    code: AreaCode,
    raw: &str,
) -> Result<CodeRecord, MalformedResponse> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;

    let Value::Object(object) = value else {
        return Ok(CodeRecord::empty(code, NOT_AN_OBJECT_REASON));
    };

    if object.is_empty() {
        return Ok(CodeRecord::empty(code, NO_INFORMATION_REASON));
    }

    let general = object.get(GENERAL_GROUP).and_then(Value::as_object);
    let geographic = object.get(GEOGRAPHIC_GROUP).and_then(Value::as_object);
    let (Some(general), Some(geographic)) = (general, geographic) else {
        let reason = model_reason(&object).unwrap_or(MISSING_GROUPS_REASON);
        return Ok(CodeRecord::empty(code, reason));
    };

    let facts = ExtractedFacts {
        in_use: is_in_use(general.get("code_in_use")),
        assignable: is_affirmative(general.get("assignable")),
        location: text_field(geographic.get("location")),
        country: text_field(geographic.get("country")),
    };
    Ok(CodeRecord::from_facts(code, facts))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening fence line. A fence that
    // never breaks the line wraps the JSON directly.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

fn model_reason(object: &Map<String, Value>) -> Option<&str> {
    object
        .get("reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|r| !r.is_empty())
}

/// `"Yes"`/`"Y"` in any case, or JSON `true`.
fn is_affirmative(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("y")
        }
        _ => false,
    }
}

/// Present and not `"No"`/`"N"` (any case) or JSON `false`. Absent or `null` is not in use.
fn is_in_use(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            let s = s.trim();
            !(s.eq_ignore_ascii_case("no") || s.eq_ignore_ascii_case("n"))
        }
        Some(_) => true,
    }
}

fn text_field(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_owned()
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
