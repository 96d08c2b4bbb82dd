//! Fuzzy search patterns for accented and phonetically spelled text.
//!
//! [`fuzzy_pattern`] turns what a person types in a search box into a regular expression
//! that tolerates missing or extra accents, repeated vowels, a few common phonetic
//! spellings (`f`/`ph`, `cs`/`x`, `ck`/`c`/`k`, `ç`/`c`/`s`) and number words written as
//! digits. Patterns are always matched case-insensitively.
//!
//! ```ignore
//! use doccrud_core::search::fuzzy_pattern;
//!
//! assert_eq!(fuzzy_pattern("Fé"), ".*(f|ph)+[eéêèë]+.*");
//! ```

use std::iter::once;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Regex options applied to every search pattern.
pub const SEARCH_OPTIONS: &str = "i";

const DIGIT_WORDS: [(&str, char); 10] = [
    ("zero", '0'),
    ("um", '1'),
    ("dois", '2'),
    ("tres", '3'),
    ("quatro", '4'),
    ("cinco", '5'),
    ("seis", '6'),
    ("sete", '7'),
    ("oito", '8'),
    ("nove", '9'),
];

const DIGRAPHS: [(&str, &str); 2] = [("ck", "[ck]+"), ("cs", "(x|cs)+")];

/// A regular expression used to search text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    pattern: String,
}

impl SearchPattern {
    /// Builds the fuzzy pattern for a human search string.
    pub fn fuzzy(value: &str) -> Self {
        Self { pattern: fuzzy_pattern(value) }
    }

    /// Uses a caller-supplied regular expression as-is.
    pub fn raw(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into() }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> &'static str {
        SEARCH_OPTIONS
    }
}

impl From<&str> for SearchPattern {
    fn from(value: &str) -> Self {
        SearchPattern::fuzzy(value)
    }
}

impl From<String> for SearchPattern {
    fn from(value: String) -> Self {
        SearchPattern::fuzzy(&value)
    }
}

/// Lower-cases `value` and strips its diacritics, keeping `ç`.
pub fn fold_diacritics(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());

    // Decomposed input must recompose first so `c` + U+0327 is kept as `ç`.
    let composed = value.nfc().collect::<String>();
    for c in composed.to_lowercase().chars() {
        if c == 'ç' {
            folded.push(c);
            continue;
        }
        folded.extend(once(c).nfd().filter(|m| !is_combining_mark(*m)));
    }

    folded
}

/// Converts a human search string into a fuzzy, case-insensitive regular expression that
/// matches the string anywhere inside a field.
pub fn fuzzy_pattern(value: &str) -> String {
    let folded = fold_diacritics(value);
    let mut pattern = String::from(".*");
    let mut rest = folded.as_str();

    while let Some(c) = rest.chars().next() {
        if let Some((word, digit)) = DIGIT_WORDS.iter().find(|(word, _)| rest.starts_with(word)) {
            pattern.push('(');
            word.chars().for_each(|letter| push_letter(&mut pattern, letter));
            pattern.push('|');
            pattern.push(*digit);
            pattern.push(')');
            rest = &rest[word.len()..];
            continue;
        }

        if let Some((digraph, fragment)) = DIGRAPHS.iter().find(|(digraph, _)| rest.starts_with(digraph)) {
            pattern.push_str(fragment);
            rest = &rest[digraph.len()..];
            continue;
        }

        if c.is_whitespace() {
            pattern.push_str(".+?");
            rest = rest.trim_start();
            continue;
        }

        push_letter(&mut pattern, c);
        rest = &rest[c.len_utf8()..];
    }

    pattern.push_str(".*");
    pattern
}

fn push_letter(pattern: &mut String, c: char) {
    match c {
        'a' => pattern.push_str("[aáãâàä]+"),
        'e' => pattern.push_str("[eéêèë]+"),
        'i' => pattern.push_str("[iíîìï]+"),
        'o' => pattern.push_str("[oóôõòö]+"),
        'u' => pattern.push_str("[uúûùü]+"),
        'ç' => pattern.push_str("[cçs]+"),
        'f' => pattern.push_str("(f|ph)+"),
        '.' => pattern.push_str(".?"),
        '-' => {}
        '*' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\' => {
            pattern.push('\\');
            pattern.push(c);
        }
        _ => pattern.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    fn matches(search: &str, text: &str) -> bool {
        RegexBuilder::new(&fuzzy_pattern(search))
            .case_insensitive(true)
            .build()
            .unwrap()
            .is_match(text)
    }

    #[test]
    fn folds_accents_and_case() {
        assert_eq!(fold_diacritics("JOSÉ Conceição"), "jose conceiçao");
    }

    #[test]
    fn builds_vowel_and_phonetic_classes() {
        assert_eq!(fuzzy_pattern("Fé"), ".*(f|ph)+[eéêèë]+.*");
        assert_eq!(fuzzy_pattern("mack"), ".*m[aáãâàä]+[ck]+.*");
        assert_eq!(fuzzy_pattern("csv"), ".*(x|cs)+v.*");
    }

    #[test]
    fn escapes_metacharacters_and_relaxes_punctuation() {
        assert_eq!(fuzzy_pattern("(x)"), r".*\(x\).*");
        assert_eq!(fuzzy_pattern("a.b-c"), ".*[aáãâàä]+.?bc.*");
        assert!(matches("c++", "C++ primer"));
        assert!(!matches("c++", "cc primer"));
    }

    #[test]
    fn matches_accent_variants() {
        assert!(matches("jose", "José da Silva"));
        assert!(matches("JOSÉ", "jose"));
        assert!(matches("conceição", "Conceicao"));
        assert!(matches("sao paulo", "SÃO PAULO"));
        assert!(matches("serie", "Série"));
        assert!(matches("sé-rie", "serie"));
    }

    #[test]
    fn matches_phonetic_variants() {
        assert!(matches("farmacia", "Pharmácia Central"));
        assert!(matches("açucar", "assucar"));
        assert!(matches("macsine", "Maxine"));
    }

    #[test]
    fn matches_number_words_as_digits() {
        assert!(matches("rua tres", "Rua 3"));
        assert!(matches("dois irmaos", "2 irmãos"));
        assert!(matches("apto nove", "Apto 9"));
        assert!(matches("tres", "três"));
        assert_eq!(fuzzy_pattern("um"), ".*([uúûùü]+m|1).*");
    }

    #[test]
    fn number_words_inside_words_keep_accent_folding() {
        assert!(matches("numero", "Número"));
        assert!(matches("umido", "Úmido"));
        assert!(matches("setembro", "Setémbro"));
        assert!(matches("numero", "n1ero"));
    }

    #[test]
    fn decomposed_input_keeps_cedilla() {
        let decomposed = "Conc\u{0327}a\u{0303}o";

        assert_eq!(fold_diacritics(decomposed), "conçao");
        assert!(matches(decomposed, "Conssão"));
        assert!(matches("c\u{0327}", "s"));
    }

    #[test]
    fn whitespace_spans_any_gap() {
        assert!(matches("ana maria", "Ana de Maria"));
        assert!(!matches("ana maria", "Ana"));
        assert!(matches("change", "Name changed"));
    }

    #[test]
    fn raw_patterns_are_kept() {
        let pattern = SearchPattern::raw("^abc$");

        assert_eq!(pattern.pattern(), "^abc$");
        assert_eq!(pattern.options(), "i");
        assert_eq!(SearchPattern::from("Fé").pattern(), fuzzy_pattern("Fé"));
    }
}
