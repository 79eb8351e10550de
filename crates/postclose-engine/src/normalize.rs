//! Text canonicalization ahead of matching.
//!
//! Both the reference script and the transcript segment pass through here
//! so that matching compares like with like: NFKC fold, lowercase,
//! contraction expansion, spelled-out numbers to digits, punctuation
//! stripped, whitespace collapsed. Every surviving token keeps its
//! character span in the source text so verdicts can report spans
//! reviewers can locate.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::NormalizedToken;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Word-ish runs: letters/digits, keeping token-internal apostrophes
    /// and hyphens attached for the contraction and number passes.
    static ref WORD_PATTERN: Regex =
        Regex::new(r"[\p{L}\p{N}]+(?:['\u{2019}-][\p{L}\p{N}]+)*").unwrap();
}

/// Contraction expansions, applied token-by-token after case folding.
const CONTRACTIONS: &[(&str, &str)] = &[
    ("ain't", "is not"),
    ("aren't", "are not"),
    ("can't", "can not"),
    ("couldn't", "could not"),
    ("didn't", "did not"),
    ("doesn't", "does not"),
    ("don't", "do not"),
    ("hasn't", "has not"),
    ("haven't", "have not"),
    ("i'd", "i would"),
    ("i'll", "i will"),
    ("i'm", "i am"),
    ("i've", "i have"),
    ("isn't", "is not"),
    ("let's", "let us"),
    ("mustn't", "must not"),
    ("shouldn't", "should not"),
    ("they'll", "they will"),
    ("they're", "they are"),
    ("they've", "they have"),
    ("wasn't", "was not"),
    ("we'll", "we will"),
    ("we're", "we are"),
    ("we've", "we have"),
    ("weren't", "were not"),
    ("won't", "will not"),
    ("wouldn't", "would not"),
    ("you'd", "you would"),
    ("you'll", "you will"),
    ("you're", "you are"),
    ("you've", "you have"),
];

/// Spelled-out numbers converted to digit strings. Covers the values that
/// show up in disclosure language (terms, rates, day counts); larger
/// figures arrive from ASR as digits already.
const NUMBER_WORDS: &[(&str, &str)] = &[
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
    ("thirteen", "13"),
    ("fourteen", "14"),
    ("fifteen", "15"),
    ("sixteen", "16"),
    ("seventeen", "17"),
    ("eighteen", "18"),
    ("nineteen", "19"),
    ("twenty", "20"),
    ("thirty", "30"),
    ("forty", "40"),
    ("fifty", "50"),
    ("sixty", "60"),
    ("seventy", "70"),
    ("eighty", "80"),
    ("ninety", "90"),
    ("hundred", "100"),
    ("thousand", "1000"),
];

/// A normalized token stream plus the canonical joined string.
#[derive(Debug, Clone, Default)]
pub struct NormalizedText {
    pub tokens: Vec<NormalizedToken>,
    /// Token texts joined with single spaces
    pub text: String,
}

/// Canonicalize `source` into comparable tokens.
///
/// Empty or all-punctuation input yields an empty token stream, not an
/// error; downstream treats that as "everything missing".
pub fn normalize(source: &str) -> NormalizedText {
    let mut tokens: Vec<NormalizedToken> = Vec::new();

    // Track byte -> char offset incrementally; matches arrive in order.
    let mut last_byte = 0usize;
    let mut last_char = 0usize;

    for m in WORD_PATTERN.find_iter(source) {
        let start_char = last_char + source[last_byte..m.start()].chars().count();
        let end_char = start_char + m.as_str().chars().count();
        last_byte = m.end();
        last_char = end_char;

        let folded = fold(m.as_str());
        let words = expand(&folded);
        subdivide_span(&mut tokens, &words, start_char, end_char);
    }

    let text = tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    NormalizedText { tokens, text }
}

/// Slice `source` by character offsets (token spans are character-based).
pub fn span_text(source: &str, start: usize, end: usize) -> String {
    source
        .chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

/// NFKC fold, lowercase, straighten curly apostrophes.
fn fold(raw: &str) -> String {
    raw.nfkc().collect::<String>().to_lowercase().replace('\u{2019}', "'")
}

/// Expand one folded token into its normalized words.
fn expand(folded: &str) -> Vec<String> {
    if let Some((_, expansion)) = CONTRACTIONS.iter().find(|(c, _)| *c == folded) {
        return expansion.split(' ').map(number_word).collect();
    }

    // ASR renders a contracted "is" as a bare 's ("rate's locked").
    if let Some(stem) = folded.strip_suffix("'s") {
        if stem.chars().count() >= 2 {
            return vec![number_word(stem), "is".to_string()];
        }
    }

    if let Some(compound) = hyphen_compound(folded) {
        return vec![compound];
    }

    let stripped: String = folded.chars().filter(|c| *c != '\'').collect();
    if stripped.is_empty() {
        return Vec::new();
    }
    vec![number_word(&stripped)]
}

fn number_word(word: &str) -> String {
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, d)| d.to_string())
        .unwrap_or_else(|| word.to_string())
}

/// "twenty-five" -> "25"; any other hyphenated token is left alone.
fn hyphen_compound(folded: &str) -> Option<String> {
    let (tens_word, unit_word) = folded.split_once('-')?;
    let tens: u32 = NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == tens_word)
        .and_then(|(_, d)| d.parse().ok())?;
    let unit: u32 = NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == unit_word)
        .and_then(|(_, d)| d.parse().ok())?;
    if tens >= 20 && tens % 10 == 0 && unit < 10 {
        Some((tens + unit).to_string())
    } else {
        None
    }
}

/// Push `words` as tokens sharing the source span [start, end), subdividing
/// it into contiguous pieces so spans stay non-overlapping and monotonic.
fn subdivide_span(tokens: &mut Vec<NormalizedToken>, words: &[String], start: usize, end: usize) {
    let k = words.len();
    if k == 0 {
        return;
    }
    let span_len = end - start;
    for (i, word) in words.iter().enumerate() {
        let s = start + (span_len * i) / k;
        let e = if i + 1 == k {
            end
        } else {
            start + (span_len * (i + 1)) / k
        };
        tokens.push(NormalizedToken {
            text: word.clone(),
            start: s,
            end: e,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        let norm = normalize("This call MAY be recorded!");
        assert_eq!(norm.text, "this call may be recorded");
    }

    #[test]
    fn test_expands_contractions() {
        let norm = normalize("Don't worry, you're covered.");
        assert_eq!(norm.text, "do not worry you are covered");
    }

    #[test]
    fn test_contracted_is_becomes_two_words() {
        let norm = normalize("your rate's locked in");
        assert_eq!(norm.text, "your rate is locked in");
    }

    #[test]
    fn test_converts_number_words() {
        let norm = normalize("locked for twelve months at forty-five dollars");
        assert_eq!(norm.text, "locked for 12 months at 45 dollars");
    }

    #[test]
    fn test_collapses_whitespace() {
        let norm = normalize("  your   rate \n is locked  ");
        assert_eq!(norm.text, "your rate is locked");
    }

    #[test]
    fn test_empty_input_yields_empty_stream() {
        let norm = normalize("");
        assert!(norm.tokens.is_empty());
        assert_eq!(norm.text, "");

        let punct = normalize("... !!! ???");
        assert!(punct.tokens.is_empty());
    }

    #[test]
    fn test_token_spans_point_into_source() {
        let source = "Your rate is locked.";
        let norm = normalize(source);
        let rate = &norm.tokens[1];
        assert_eq!(span_text(source, rate.start, rate.end), "rate");
    }

    #[test]
    fn test_contraction_spans_stay_monotonic() {
        let source = "we don't record";
        let norm = normalize(source);
        assert_eq!(norm.text, "we do not record");
        for pair in norm.tokens.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        // Both expansion tokens stay inside the span of "don't" (chars 3..8).
        assert_eq!(norm.tokens[1].start, 3);
        assert_eq!(norm.tokens[2].end, 8);
    }

    #[test]
    fn test_nfkc_folds_fullwidth_forms() {
        let norm = normalize("ｒａｔｅ locked");
        assert_eq!(norm.text, "rate locked");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Spans are non-overlapping, monotonically increasing, and inside
        /// the source text for arbitrary input.
        #[test]
        fn spans_monotonic_and_bounded(source in "\\PC{0,200}") {
            let total_chars = source.chars().count();
            let norm = normalize(&source);
            let mut prev_end = 0usize;
            for token in &norm.tokens {
                prop_assert!(token.start <= token.end);
                prop_assert!(token.start >= prev_end);
                prop_assert!(token.end <= total_chars);
                prev_end = token.end;
            }
        }

        /// Normalizing already-normalized text is a fixpoint.
        #[test]
        fn normalize_is_idempotent_on_output(source in "[a-zA-Z0-9' .,!?]{0,120}") {
            let once = normalize(&source);
            let twice = normalize(&once.text);
            prop_assert_eq!(once.text, twice.text);
        }

        /// Token texts never contain whitespace or stripped punctuation.
        #[test]
        fn tokens_are_clean(source in "\\PC{0,200}") {
            let norm = normalize(&source);
            for token in &norm.tokens {
                prop_assert!(!token.text.is_empty());
                prop_assert!(!token.text.chars().any(char::is_whitespace));
                prop_assert!(!token.text.contains('\''));
            }
        }
    }
}
