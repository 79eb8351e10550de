//! Reference script decomposition into required units.
//!
//! Unit boundaries are a human-authored property, so the split runs on the
//! original script text (sentence-ending punctuation) before any
//! normalization. Ordinal ids define the required reading order.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{ReferenceScript, ScriptUnit};

use crate::error::ConfigError;

lazy_static! {
    /// Sentence boundaries in authored script text
    static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?]+").unwrap();
}

/// Split a reference script into ordered units with variants attached.
///
/// An empty script, or a variant map / optional-unit list naming an id the
/// script does not have, is a configuration error; nothing is scored.
pub fn decompose(script: &ReferenceScript) -> Result<Vec<ScriptUnit>, ConfigError> {
    let sentences: Vec<&str> = SENTENCE_BOUNDARY
        .split(&script.script_text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.is_empty() {
        return Err(ConfigError::EmptyScript);
    }
    let unit_count = sentences.len();

    for &unit_id in script.variants.keys() {
        if unit_id == 0 || unit_id > unit_count {
            return Err(ConfigError::UnknownVariantUnit {
                unit_id,
                unit_count,
            });
        }
    }
    for &unit_id in &script.optional_units {
        if unit_id == 0 || unit_id > unit_count {
            return Err(ConfigError::UnknownOptionalUnit {
                unit_id,
                unit_count,
            });
        }
    }

    Ok(sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| {
            let id = index + 1;
            ScriptUnit {
                id,
                canonical_text: sentence.to_string(),
                variants: script.variants.get(&id).cloned().unwrap_or_default(),
                required: !script.optional_units.contains(&id),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(text: &str) -> ReferenceScript {
        ReferenceScript::new(text)
    }

    #[test]
    fn test_splits_on_sentence_punctuation() {
        let units =
            decompose(&script("This call may be recorded. Your rate is locked! Any questions?"))
                .unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].canonical_text, "This call may be recorded");
        assert_eq!(units[1].canonical_text, "Your rate is locked");
        assert_eq!(units[2].canonical_text, "Any questions");
    }

    #[test]
    fn test_ids_are_ordinal_from_one() {
        let units = decompose(&script("First. Second. Third.")).unwrap();
        let ids: Vec<usize> = units.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_attaches_variants_by_unit_id() {
        let mut s = script("This call may be recorded. Your rate is locked.");
        s.variants
            .insert(2, vec!["Your rate is guaranteed".to_string()]);
        let units = decompose(&s).unwrap();
        assert!(units[0].variants.is_empty());
        assert_eq!(units[1].variants, vec!["Your rate is guaranteed"]);
    }

    #[test]
    fn test_marks_optional_units() {
        let mut s = script("Required part. Thanks for your time.");
        s.optional_units = vec![2];
        let units = decompose(&s).unwrap();
        assert!(units[0].required);
        assert!(!units[1].required);
    }

    #[test]
    fn test_empty_script_is_config_error() {
        assert_eq!(decompose(&script("")), Err(ConfigError::EmptyScript));
        assert_eq!(decompose(&script("  ... ")), Err(ConfigError::EmptyScript));
    }

    #[test]
    fn test_unknown_variant_id_is_config_error() {
        let mut s = script("Only one sentence.");
        s.variants.insert(4, vec!["alternate".to_string()]);
        assert_eq!(
            decompose(&s),
            Err(ConfigError::UnknownVariantUnit {
                unit_id: 4,
                unit_count: 1
            })
        );
    }

    #[test]
    fn test_unknown_optional_id_is_config_error() {
        let mut s = script("Only one sentence.");
        s.optional_units = vec![0];
        assert_eq!(
            decompose(&s),
            Err(ConfigError::UnknownOptionalUnit {
                unit_id: 0,
                unit_count: 1
            })
        );
    }

    #[test]
    fn test_trailing_text_without_punctuation_is_a_unit() {
        let units = decompose(&script("First sentence. trailing fragment")).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].canonical_text, "trailing fragment");
    }
}
