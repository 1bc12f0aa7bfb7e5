//! Per-field resolution tables for heterogeneous JSON job objects.
//!
//! Each field is described as data: an ordered list of candidate paths and a
//! default. Candidates are tried left to right and the first non-empty scalar
//! wins. Arrays met along a path resolve to their first element, so
//! `jobLocation` works whether a site emits an object or a list of them.

use serde_json::Value;

/// A path of object keys into a JSON value
pub type FieldPath = &'static [&'static str];

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub candidates: &'static [FieldPath],
    pub default: &'static str,
}

impl FieldRule {
    pub const fn new(candidates: &'static [FieldPath], default: &'static str) -> Self {
        Self { candidates, default }
    }

    /// First non-empty candidate, if any
    pub fn find(&self, value: &Value) -> Option<String> {
        self.candidates
            .iter()
            .find_map(|path| lookup(value, path).and_then(scalar_text))
    }

    /// First non-empty candidate, else the rule's default
    pub fn resolve(&self, value: &Value) -> String {
        self.find(value).unwrap_or_else(|| self.default.to_string())
    }
}

/// Walk `path` through `value`, stepping into the first element of any array
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = first_of(value)?;
    for key in path {
        current = first_of(current.get(*key)?)?;
    }
    Some(current)
}

fn first_of(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

/// Render a scalar as trimmed text; objects, nulls and blanks are not text
pub fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Collect a list-valued field that may arrive as an array or a comma separated string
pub fn string_list(value: &Value, path: &[&str]) -> Vec<String> {
    let mut current = value;
    for key in path {
        match current.get(*key) {
            Some(next) => current = next,
            None => return Vec::new(),
        }
    }

    match current {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COMPANY: FieldRule = FieldRule::new(
        &[&["hiringOrganization", "name"], &["hiringOrganization"], &["company"]],
        "Unknown Company",
    );

    #[test]
    fn test_first_candidate_wins() {
        let value = json!({"hiringOrganization": {"name": "Acme"}, "company": "Other"});
        assert_eq!(COMPANY.resolve(&value), "Acme");
    }

    #[test]
    fn test_falls_through_to_later_candidate() {
        let value = json!({"hiringOrganization": "Acme Inc"});
        assert_eq!(COMPANY.resolve(&value), "Acme Inc");
    }

    #[test]
    fn test_blank_candidate_is_skipped() {
        let value = json!({"hiringOrganization": {"name": "  "}, "company": "Beta"});
        assert_eq!(COMPANY.resolve(&value), "Beta");
    }

    #[test]
    fn test_default_when_nothing_matches() {
        assert_eq!(COMPANY.resolve(&json!({})), "Unknown Company");
    }

    #[test]
    fn test_lookup_steps_into_lists() {
        let value = json!({"jobLocation": [{"address": {"addressLocality": "Pune"}}, {}]});
        let found = lookup(&value, &["jobLocation", "address", "addressLocality"]);
        assert_eq!(found, Some(&json!("Pune")));
    }

    #[test]
    fn test_string_list_from_comma_string() {
        let value = json!({"skills": "Rust, Tokio , ,SQL"});
        assert_eq!(string_list(&value, &["skills"]), vec!["Rust", "Tokio", "SQL"]);
    }
}
