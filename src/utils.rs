use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());
static BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\[[^\]]*\]").unwrap());
static FEAT_IN_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\(?\s*(?:feat\.?|featuring|ft\.?)\s+[^)]*\)?").unwrap());
static REMIX_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-\s*[^-]*(?:remix|version|mix|edit)[^-]*").unwrap());
static ORIGINAL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*-\s*original\s*$").unwrap());
static REMASTER_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-\s*remastered.*$").unwrap());
static RADIO_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*-\s*radio.*$").unwrap());
static QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"`]"#).unwrap());
static FEAT_IN_ARTIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:feat\.?|featuring|ft\.?|f\.)\s+.*$").unwrap());
static LEADING_THE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^the\s+").unwrap());

/// Canonicalizes free text for comparison: lowercase, diacritics stripped,
/// punctuation replaced by whitespace, whitespace collapsed. Idempotent;
/// empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let no_punct = NON_WORD.replace_all(&stripped, " ");
    WHITESPACE.replace_all(&no_punct, " ").trim().to_string()
}

/// Removes parenthetical and bracketed content entirely.
pub fn strip_parentheticals(text: &str) -> String {
    let no_parens = PARENS.replace_all(text, "");
    let no_brackets = BRACKETS.replace_all(&no_parens, "");
    WHITESPACE.replace_all(&no_brackets, " ").trim().to_string()
}

/// Cleans a track or album title of the annotations that commonly differ
/// between catalogs: featuring credits, parenthetical/bracketed content,
/// remix and remaster suffixes, quotes.
pub fn clean_title(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }

    let mut cleaned = FEAT_IN_TITLE.replace_all(title, "").to_string();
    cleaned = PARENS.replace_all(&cleaned, "").to_string();
    cleaned = BRACKETS.replace_all(&cleaned, "").to_string();
    cleaned = REMIX_SUFFIX.replace_all(&cleaned, "").to_string();
    cleaned = ORIGINAL_SUFFIX.replace_all(&cleaned, "").to_string();
    cleaned = REMASTER_SUFFIX.replace_all(&cleaned, "").to_string();
    cleaned = RADIO_SUFFIX.replace_all(&cleaned, "").to_string();
    cleaned = QUOTES.replace_all(&cleaned, "").to_string();
    WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}

/// Cleans an artist name of the conventions that differ between catalogs:
/// "Various Artists" placeholders, parenthetical qualifiers, a leading
/// "The", featuring credits and ampersand variants.
pub fn clean_artist(artist: &str) -> String {
    if artist.is_empty() {
        return String::new();
    }

    match artist.to_lowercase().as_str() {
        "various artists" | "various" | "va" => return String::new(),
        _ => {}
    }

    let mut cleaned = PARENS.replace_all(artist, "").to_string();
    cleaned = LEADING_THE.replace_all(&cleaned, "").to_string();
    cleaned = FEAT_IN_ARTIST.replace_all(&cleaned, "").to_string();
    cleaned = cleaned.replace('&', "and");
    cleaned = cleaned.replace(" + ", " and ");
    WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}

/// Parses a Discogs duration string (`"MM:SS"`) into seconds. Malformed
/// strings yield `None` without failing the track.
pub fn parse_duration(duration: &str) -> Option<u32> {
    let mut parts = duration.trim().split(':');
    let minutes: u32 = parts.next()?.parse().ok()?;
    let seconds: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Parses a Discogs position string (`"A1"`, `"3"`, `"B2"`) into a track
/// number by extracting the digits. Positions without digits yield `None`.
pub fn parse_position(position: &str) -> Option<u32> {
    let digits: String = position.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
