//! Windowed fuzzy matching of script units against the transcript.
//!
//! Each unit is searched for with a sliding token window sized to the
//! unit's token count plus or minus the configured tolerance. A window is
//! scored against the canonical wording and every pre-approved variant;
//! the best window wins. Ties go to the earliest window so an agent who
//! repeats a disclosure later cannot paper over a botched first attempt.

use std::collections::HashMap;

use shared_types::{MatchStatus, ScriptUnit, UnitMatch};

use crate::normalize::{normalize, span_text, NormalizedText};
use crate::EngineConfig;

/// Weight of the order-insensitive overlap component. Sequence-aware LCS
/// carries the rest: legal language is order-sensitive at the word level.
const OVERLAP_WEIGHT: f64 = 0.4;
const SEQUENCE_WEIGHT: f64 = 0.6;

/// Match one script unit against the normalized transcript.
///
/// `transcript_source` is the raw segment text; matched text is sliced out
/// of it by token span so reviewers see what the agent actually said.
pub fn match_unit(
    unit: &ScriptUnit,
    transcript: &NormalizedText,
    transcript_source: &str,
    config: &EngineConfig,
) -> UnitMatch {
    let phrasings: Vec<Vec<String>> = std::iter::once(unit.canonical_text.as_str())
        .chain(unit.variants.iter().map(String::as_str))
        .map(|p| normalize(p).tokens.into_iter().map(|t| t.text).collect())
        .filter(|tokens: &Vec<String>| !tokens.is_empty())
        .collect();

    let phrase_views: Vec<(Vec<&str>, (usize, usize))> = phrasings
        .iter()
        .map(|p| {
            let view: Vec<&str> = p.iter().map(String::as_str).collect();
            let bounds = window_bounds(view.len(), config.window_tolerance);
            (view, bounds)
        })
        .collect();

    let transcript_tokens: Vec<&str> = transcript.tokens.iter().map(|t| t.text.as_str()).collect();

    let mut best: Option<(f64, (usize, usize))> = None;

    // Earliest start position wins ties, so starts are the outer loop.
    for start in 0..transcript_tokens.len() {
        for (phrase, (min_len, max_len)) in &phrase_views {
            for len in *min_len..=*max_len {
                let end = start + len;
                if end > transcript_tokens.len() {
                    break;
                }
                let score = window_score(phrase, &transcript_tokens[start..end]);
                if best.map_or(true, |(b, _)| score > b) {
                    best = Some((score, (start, end)));
                }
            }
        }
    }

    match best {
        Some((score, (start, end))) if score >= config.fuzzy_floor => {
            let status = if score >= config.exact_floor {
                MatchStatus::Exact
            } else {
                MatchStatus::Fuzzy(score)
            };
            let span_start = transcript.tokens[start].start;
            let span_end = transcript.tokens[end - 1].end;
            UnitMatch {
                unit_id: unit.id,
                status,
                matched_span: Some((start, end)),
                matched_text: Some(span_text(transcript_source, span_start, span_end)),
            }
        }
        _ => UnitMatch {
            unit_id: unit.id,
            status: MatchStatus::Missing,
            matched_span: None,
            matched_text: None,
        },
    }
}

/// Window lengths considered for a phrase of `phrase_len` tokens.
fn window_bounds(phrase_len: usize, tolerance: f64) -> (usize, usize) {
    let min_len = ((phrase_len as f64) * (1.0 - tolerance)).floor() as usize;
    let max_len = ((phrase_len as f64) * (1.0 + tolerance)).ceil() as usize;
    (min_len.max(1), max_len.max(1))
}

/// Blend of order-insensitive overlap and order-sensitive LCS ratio.
fn window_score(phrase: &[&str], window: &[&str]) -> f64 {
    OVERLAP_WEIGHT * token_overlap_ratio(phrase, window)
        + SEQUENCE_WEIGHT * lcs_ratio(phrase, window)
}

/// Multiset Jaccard: shared token occurrences over the union size.
fn token_overlap_ratio(phrase: &[&str], window: &[&str]) -> f64 {
    if phrase.is_empty() && window.is_empty() {
        return 1.0;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in phrase {
        *counts.entry(token).or_insert(0) += 1;
    }
    let mut shared = 0usize;
    for token in window {
        if let Some(count) = counts.get_mut(token) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }
    let union = phrase.len() + window.len() - shared;
    shared as f64 / union as f64
}

/// Longest common subsequence length over the longer token count, so a
/// padded window cannot score 1.0 by merely containing the phrase.
fn lcs_ratio(phrase: &[&str], window: &[&str]) -> f64 {
    let denominator = phrase.len().max(window.len());
    if denominator == 0 {
        return 1.0;
    }
    lcs_len(phrase, window) as f64 / denominator as f64
}

fn lcs_len(a: &[&str], b: &[&str]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            curr[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
