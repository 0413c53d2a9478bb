use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

fn re_entity_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Q\d+").unwrap())
}

fn re_entity_id_exact() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Q\d+$").unwrap())
}

/// Upper-case the first character, leave the rest alone.
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First Wikidata id (`Q` + digits) found in an entity URI.
///
/// `"http://www.wikidata.org/entity/Q76"` → `Some("Q76")`.
pub fn extract_entity_id(entity_uri: &str) -> Option<String> {
    re_entity_id()
        .find(entity_uri)
        .map(|m| m.as_str().to_string())
}

/// True when `id` is exactly a Wikidata id such as `Q1001`.
pub fn is_valid_entity_id(id: &str) -> bool {
    re_entity_id_exact().is_match(id)
}

/// Whole seconds between two instants, rounded to nearest, order-insensitive.
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds().abs();
    (millis as f64 / 1000.0).round() as i64
}
