use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

/// A skill list as it is found in storage: a JSON array, a JSON document
/// encoded into a string, or nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawSkills {
    #[default]
    Missing,
    Text(String),
    List(Vec<Value>),
}

impl From<Option<Value>> for RawSkills {
    fn from(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => RawSkills::Missing,
            Some(Value::String(text)) => RawSkills::Text(text),
            Some(Value::Array(items)) => RawSkills::List(items),
            Some(other) => {
                debug!(kind = value_kind(&other), "ignoring non-list skills value");
                RawSkills::Missing
            }
        }
    }
}

impl From<Vec<String>> for RawSkills {
    fn from(skills: Vec<String>) -> Self {
        RawSkills::List(skills.into_iter().map(Value::String).collect())
    }
}

/// Anything that is not a list of strings yields nothing.
pub fn normalize(raw: &RawSkills) -> Vec<String> {
    match raw {
        RawSkills::Missing => Vec::new(),
        RawSkills::List(items) => collect_tokens(items),
        RawSkills::Text(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => collect_tokens(&items),
            Ok(other) => {
                debug!(kind = value_kind(&other), "decoded skills text is not a list");
                Vec::new()
            }
            Err(err) => {
                debug!(error = %err, "skills text is not valid JSON");
                Vec::new()
            }
        },
    }
}

pub fn parse_skills(value: Option<Value>) -> Vec<String> {
    normalize(&RawSkills::from(value))
}

pub fn parse_skill_cell(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    if trimmed.starts_with('[') {
        return normalize(&RawSkills::Text(trimmed.to_string()));
    }

    let tokens = trimmed
        .split(';')
        .map(|token| Value::String(token.trim().to_string()))
        .collect::<Vec<_>>();
    collect_tokens(&tokens)
}

fn collect_tokens(items: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();

    for item in items {
        let Value::String(token) = item else {
            continue;
        };
        if token.trim().is_empty() {
            continue;
        }
        if seen.insert(token.as_str()) {
            tokens.push(token.clone());
        }
    }

    tokens
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn native_list_is_deduplicated_in_order() {
        let raw = RawSkills::from(Some(json!(["Rust", "SQL", "Rust", "Go"])));
        assert_eq!(normalize(&raw), vec!["Rust", "SQL", "Go"]);
    }

    #[test]
    fn encoded_string_is_decoded() {
        let raw = RawSkills::from(Some(json!("[\"Python\",\"SQL\"]")));
        assert_eq!(normalize(&raw), vec!["Python", "SQL"]);
    }

    #[test]
    fn garbage_yields_empty_list() {
        assert!(parse_skills(Some(json!("not json"))).is_empty());
        assert!(parse_skills(Some(json!("{\"a\": 1}"))).is_empty());
        assert!(parse_skills(Some(json!(42))).is_empty());
        assert!(parse_skills(Some(Value::Null)).is_empty());
        assert!(parse_skills(None).is_empty());
    }

    #[test]
    fn tokens_stay_case_sensitive_and_drop_blanks() {
        let raw = RawSkills::from(Some(json!(["react", "React", "", "  ", 7, null])));
        assert_eq!(normalize(&raw), vec!["react", "React"]);
    }

    #[test]
    fn csv_cells_accept_both_forms() {
        assert_eq!(parse_skill_cell("Rust; SQL ;;Rust"), vec!["Rust", "SQL"]);
        assert_eq!(parse_skill_cell(" [\"Go\",\"Go\"] "), vec!["Go"]);
        assert!(parse_skill_cell("").is_empty());
    }

    fn raw_skills() -> impl Strategy<Value = RawSkills> {
        let token = "[A-Za-z+# ]{0,6}";
        prop_oneof![
            Just(RawSkills::Missing),
            ".{0,12}".prop_map(RawSkills::Text),
            prop::collection::vec(token, 0..8)
                .prop_map(|items| RawSkills::Text(serde_json::to_string(&items).unwrap())),
            prop::collection::vec(token, 0..8).prop_map(RawSkills::from),
        ]
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in raw_skills()) {
            let once = normalize(&raw);
            let twice = normalize(&RawSkills::from(once.clone()));
            prop_assert_eq!(once, twice);
        }
    }
}
