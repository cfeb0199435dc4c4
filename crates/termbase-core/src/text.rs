//! Text helpers shared by the data layer and the migration.

use regex::Regex;
use siphasher::sip::SipHasher24;
use std::hash::Hasher;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Key of the SipHash used for unit identities. Changing it changes every id hash.
const HASH_KEY: &[u8; 16] = b"Weblate Sip Hash";

static SLUG_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid slug strip pattern"));
static SLUG_HYPHENATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid slug hyphenate pattern"));

/// Drop characters that cannot appear in an XML 1.0 document.
///
/// Nothing else is normalized: whitespace, case and entities are kept.
#[must_use]
pub fn valid_chars_only(text: &str) -> String {
    text.chars().filter(|&c| is_xml_char(c)).collect()
}

const fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t'
            | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Turn a display name into a URL-safe slug.
///
/// Accents are decomposed and dropped, anything that is not a word
/// character, whitespace or hyphen is removed, and runs of whitespace and
/// hyphens collapse into a single hyphen.
#[must_use]
pub fn slugify(value: &str) -> String {
    let ascii: String = value.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();
    let stripped = SLUG_STRIP.replace_all(&lowered, "");
    let hyphenated = SLUG_HYPHENATE.replace_all(stripped.trim(), "-");
    hyphenated.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Identity hash of a unit, computed from its source and context.
///
/// The parts are concatenated without a separator. The result is signed so
/// it fits a 64-bit integer column.
#[must_use]
pub fn calculate_hash(parts: &[&str]) -> i64 {
    let mut hasher = SipHasher24::new_with_key(HASH_KEY);
    for part in parts {
        hasher.write(part.as_bytes());
    }
    shift_signed(hasher.finish())
}

/// Map `0..2^64` onto `-2^63..2^63` by subtracting 2^63.
const fn shift_signed(value: u64) -> i64 {
    (value ^ (1 << 63)) as i64
}

/// Number of whitespace separated words.
#[must_use]
pub fn word_count(text: &str) -> i64 {
    i64::try_from(text.split_whitespace().count()).unwrap_or(i64::MAX)
}
