use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("static regex must compile"));

/// Remove every `<...>` tag, leaving the text between them.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Entities the support pages emit inside the firmware table, in the order
/// they are decoded.
const ENTITIES: &[(&str, &str)] = &[
    ("&NewLine;", ""),
    ("&Tab;", ""),
    ("&nbsp;", ""),
    ("&lpar;", "("),
    ("&rpar;", ")"),
];

/// Decode the fixed entity set. Newlines, tabs and non-breaking spaces are
/// dropped rather than turned into whitespace.
pub fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, replacement)| {
            acc.replace(entity, replacement)
        })
}
