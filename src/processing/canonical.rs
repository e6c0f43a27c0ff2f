use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Unicode whitespace plus the ASCII information separators (U+001C to
/// U+001F), which scraped names sometimes carry between words.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Non-empty runs of text between separators.
pub(crate) fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|word| !word.is_empty())
}

/// Collapses every whitespace run into a single space and trims the ends.
///
/// Case and accents are left untouched; this is the form product names are
/// stored in.
pub fn normalize_whitespace(text: &str) -> String {
    words(text).collect::<Vec<_>>().join(" ")
}

fn strip_marks(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Builds the matching key for a product name.
///
/// Accented letters are decomposed to their base letters, whitespace is
/// collapsed and the result is lower-cased, so `"Átmérő  X"` becomes
/// `"atmero x"`. Applying it to its own output changes nothing.
pub fn canonicalize(name: &str) -> String {
    // Lower-casing may emit new combining marks (`İ` -> `i̇`), hence the
    // second pass.
    let folded = strip_marks(&strip_marks(name).to_lowercase());
    normalize_whitespace(&folded)
}

/// [`canonicalize`] for raw JSON names; anything but a string yields `""`.
pub fn canonical_name_of(name: &Value) -> String {
    name.as_str().map(canonicalize).unwrap_or_default()
}
