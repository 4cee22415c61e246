use std::collections::HashMap;

use isolang::Language;
use once_cell::sync::Lazy;

/// Language utilities for ISO language code handling
///
/// Subtitle sources disagree on code width: the catalog source echoes
/// 2-letter ISO 639-1 codes, the episode source wants 2-letter request
/// parameters, and downloaded tracks are stored under 3-letter codes.
/// This module converts between the two widths using a static mapping
/// table, with the inverse table derived by inversion at startup.
/// Static 3-letter to 2-letter mapping for the languages the subtitle
/// sources actually serve. ISO 639-2/B aliases map to the same 2-letter
/// code as their /T counterparts.
static ISO_CODE_TABLE: &[(&str, &str)] = &[
    ("eng", "en"),
    ("fra", "fr"),
    ("fre", "fr"),
    ("spa", "es"),
    ("deu", "de"),
    ("ger", "de"),
    ("ita", "it"),
    ("por", "pt"),
    ("jpn", "ja"),
    ("kor", "ko"),
    ("zho", "zh"),
    ("chi", "zh"),
    ("rus", "ru"),
    ("ara", "ar"),
    ("hin", "hi"),
    ("nld", "nl"),
    ("dut", "nl"),
    ("pol", "pl"),
    ("tur", "tr"),
    ("vie", "vi"),
    ("tha", "th"),
    ("swe", "sv"),
    ("nor", "no"),
    ("dan", "da"),
    ("fin", "fi"),
    ("ell", "el"),
    ("gre", "el"),
    ("heb", "he"),
    ("ces", "cs"),
    ("cze", "cs"),
    ("hun", "hu"),
    ("ron", "ro"),
    ("rum", "ro"),
    ("ukr", "uk"),
    ("ind", "id"),
    ("msa", "ms"),
    ("may", "ms"),
    ("yid", "yi"),
];

/// 3-letter -> 2-letter lookup
static TO_PART1: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ISO_CODE_TABLE.iter().copied().collect());

/// 2-letter -> 3-letter lookup, derived by inverting the static table.
/// The first (ISO 639-2/T) entry for each 2-letter code wins, so /B
/// aliases never become the canonical 3-letter form.
static TO_PART2: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut inverse = HashMap::new();
    for (three, two) in ISO_CODE_TABLE.iter().copied() {
        inverse.entry(two).or_insert(three);
    }
    inverse
});

/// Narrow a language code to 2-letter (ISO 639-1) form.
///
/// Codes already two letters wide pass through unchanged. Unknown
/// 3-letter codes fall back to truncation, which is approximate and
/// not authoritative - good enough for a request parameter, not for
/// identifying a language.
pub fn to_2_letter(code: &str) -> String {
    let code = code.trim().to_lowercase();
    if code.len() == 2 {
        return code;
    }

    if let Some(two) = TO_PART1.get(code.as_str()) {
        return (*two).to_string();
    }

    if let Some(two) = Language::from_639_3(&code).and_then(|lang| lang.to_639_1()) {
        return two.to_string();
    }

    // Lossy fallback: first two characters of the unknown code
    code.chars().take(2).collect()
}

/// Widen a language code to 3-letter (ISO 639-2/T) form.
///
/// Codes already three letters wide pass through unchanged. Unknown
/// 2-letter codes are returned as-is, since there is no safe way to
/// widen them.
pub fn to_3_letter(code: &str) -> String {
    let code = code.trim().to_lowercase();
    if code.len() == 3 {
        return code;
    }

    if let Some(three) = TO_PART2.get(code.as_str()) {
        return (*three).to_string();
    }

    if let Some(lang) = Language::from_639_1(&code) {
        return lang.to_639_3().to_string();
    }

    code
}

/// Check if two language codes refer to the same language, regardless
/// of code width.
pub fn codes_match(code1: &str, code2: &str) -> bool {
    to_2_letter(code1) == to_2_letter(code2)
}

/// English name of a language, used to phrase translation prompts.
pub fn language_name(code: &str) -> Option<String> {
    let narrowed = to_2_letter(code);
    Language::from_639_1(&narrowed)
        .or_else(|| Language::from_639_3(&to_3_letter(code)))
        .map(|lang| lang.to_name().to_string())
}
