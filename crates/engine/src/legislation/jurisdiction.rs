//! Jurisdiction name normalization.

/// Alias (already folded) -> canonical name.
const ALIASES: &[(&str, &str)] = &[
    ("australia", "Australia"),
    ("au", "Australia"),
    ("aus", "Australia"),
    ("commonwealth of australia", "Australia"),
    ("european union", "European Union"),
    ("eu", "European Union"),
    ("europe", "European Union"),
    ("united kingdom", "United Kingdom"),
    ("uk", "United Kingdom"),
    ("gb", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("britain", "United Kingdom"),
    ("california", "California"),
    ("us ca", "California"),
    ("ca us", "California"),
    ("us california", "California"),
    ("canada", "Canada"),
    ("ca", "Canada"),
    ("can", "Canada"),
    ("singapore", "Singapore"),
    ("sg", "Singapore"),
    ("sgp", "Singapore"),
    ("china", "China"),
    ("cn", "China"),
    ("prc", "China"),
    ("united states", "United States"),
    ("united states of america", "United States"),
    ("us", "United States"),
    ("usa", "United States"),
];

/// Lowercase, treat `_` and `-` as spaces, collapse whitespace.
fn fold(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(folded: &str) -> String {
    folded
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical jurisdiction name. Unknown inputs are title-cased and passed
/// through (`"new_atlantis"` -> `"New Atlantis"`).
pub fn normalize_jurisdiction(raw: &str) -> String {
    let folded = fold(raw);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == folded)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| title_case(&folded))
}

/// Whether `raw` resolves through the alias table.
pub fn is_known_jurisdiction(raw: &str) -> bool {
    let folded = fold(raw);
    ALIASES.iter().any(|(alias, _)| *alias == folded)
}

/// Canonical names, deduplicated, in table order.
pub fn known_jurisdictions() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for (_, canonical) in ALIASES {
        if !names.contains(canonical) {
            names.push(canonical);
        }
    }
    names
}
