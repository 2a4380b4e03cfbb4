//! Best-effort plural-name-to-Kind inference.
//!
//! Fallback only: callers must prefer an explicit table entry or the
//! discovery-built scheme whenever one is available. The suffix rules are
//! deliberately bounded and produce an imperfect but deterministic result for
//! plurals they don't cover.

/// Plural names whose Kind does not follow the suffix rules.
const IRREGULAR_KINDS: &[(&str, &str)] = &[
    ("componentstatuses", "ComponentStatus"),
    ("endpoints", "Endpoints"),
];

/// Derive a display Kind from a plural resource name.
///
/// Irregular plurals come from a fixed table; otherwise `ies` becomes `y`
/// (stories → Story), a trailing `s` is stripped, and the first letter is
/// capitalized.
pub fn infer_kind(plural: &str) -> String {
    if let Some(&(_, kind)) = IRREGULAR_KINDS.iter().find(|(name, _)| *name == plural) {
        return kind.to_string();
    }

    let singular = if let Some(stem) = plural.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = plural.strip_suffix('s') {
        stem.to_string()
    } else {
        plural.to_string()
    };

    capitalize(&singular)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
