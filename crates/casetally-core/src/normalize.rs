use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Spacing accent marks that PDF text extraction emits as separate glyphs:
/// diaeresis, acute, grave, tilde, small tilde, caron, circumflex.
const SPACING_MARKS: &str = r"[\u{a8}\u{b4}`~\u{2dc}\u{2c7}\^]";

/// Letter, optional spaces, spacing mark, optional spaces, letter
/// (e.g. `"Co´rdoba"`, `"Neuque ´n"`).
static SEPARATED_MARK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(\p{{L}})\s*{SPACING_MARKS}\s*(\p{{L}})")).unwrap()
});

static STRAY_MARK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(SPACING_MARKS).unwrap());

/// Drop spacing accent marks left behind by PDF extraction, joining the
/// letters on either side.
///
/// `"Co´rdoba"` → `"Cordoba"`, `"Rı ´o Negro"` → `"Rıo Negro"`.
pub fn strip_separated_accents(text: &str) -> String {
    let joined = SEPARATED_MARK_RE.replace_all(text, "$1$2");
    STRAY_MARK_RE.replace_all(&joined, "").into_owned()
}

/// Lowercase ASCII form of `text` used for fuzzy comparison.
///
/// Steps (order matters):
/// 1. Repair separated spacing accents
/// 2. Map characters NFKD leaves alone (dotless i, ligatures) to ASCII
/// 3. NFKD normalization (decomposes accents)
/// 4. Strip to ASCII
/// 5. Lowercase
///
/// Whitespace and punctuation are kept; only diacritics are removed.
pub fn transliterate(text: &str) -> String {
    let text = strip_separated_accents(text);

    let text = text
        .replace('\u{131}', "i")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"");

    let ascii: String = text.nfkd().filter(|c| c.is_ascii()).collect();
    ascii.to_lowercase()
}

/// Lowercase `text` and drop all whitespace, for token containment checks
/// that must survive arbitrary spacing (`"Buenos  Aires"` → `"buenosaires"`).
pub fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
