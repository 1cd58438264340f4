//! URL-safe slugs derived from titles and category names.

use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid slug regex"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s-]+").expect("valid separator regex"));
static WELL_FORMED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug format regex"));

/// Map accented Latin letters to their ASCII base so "Título" keeps its "i".
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

pub fn generate_slug(text: &str) -> String {
    let folded: String = text.to_lowercase().chars().map(fold_accent).collect();
    let stripped = DISALLOWED.replace_all(&folded, "");
    let hyphenated = SEPARATORS.replace_all(stripped.trim(), "-");
    hyphenated.trim_matches('-').to_string()
}

/// Whether `slug` is already in canonical form (what [`generate_slug`] emits).
pub fn is_well_formed(slug: &str) -> bool {
    WELL_FORMED.is_match(slug)
}
