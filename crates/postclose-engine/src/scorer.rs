//! Verdict assembly: percentages, pass/fail, and review flags.

use shared_types::{
    ComplianceMode, ComplianceVerdict, ParaphrasedSection, ScriptUnit, Thresholds, UnitMatch,
};

use crate::normalize::{span_text, NormalizedText};
use crate::{sequence, EngineConfig};

/// Verdict weights. They sum to 1.0; extra content is flag-only and
/// carries no weight.
const WORD_WEIGHT: f64 = 0.35;
const PHRASE_WEIGHT: f64 = 0.25;
const SEQUENCE_WEIGHT: f64 = 0.20;
const SIMILARITY_WEIGHT: f64 = 0.20;

/// Scores this close to the active threshold are ambiguous either way and
/// always go to a human.
const REVIEW_BAND: f64 = 5.0;

/// Fuzzy mode tolerates this many paraphrased units before commenting.
const PARAPHRASE_ALLOWANCE: usize = 3;

/// Combine per-unit matches, ordering, and the whole-segment similarity
/// cross-check into the final verdict.
///
/// `matches` is parallel to `units`. Optional units are matched and
/// reported but excluded from every percentage and from review triggers.
#[allow(clippy::too_many_arguments)]
pub fn score(
    units: &[ScriptUnit],
    matches: &[UnitMatch],
    transcript: &NormalizedText,
    transcript_source: &str,
    levenshtein_distance: usize,
    similarity_score: f64,
    mode: ComplianceMode,
    thresholds: &Thresholds,
    config: &EngineConfig,
) -> ComplianceVerdict {
    let required: Vec<(&ScriptUnit, &UnitMatch)> = units
        .iter()
        .zip(matches.iter())
        .filter(|(unit, _)| unit.required)
        .collect();
    let total_required = required.len();

    let hits = required.iter().filter(|(_, m)| m.status.is_hit()).count();
    let exacts = required.iter().filter(|(_, m)| m.status.is_exact()).count();

    let (word_match_percentage, phrase_match_percentage) = if total_required == 0 {
        (100.0, 100.0)
    } else {
        (
            100.0 * hits as f64 / total_required as f64,
            100.0 * exacts as f64 / total_required as f64,
        )
    };

    // Ordering is judged over required units only; optional flourishes may
    // be spoken wherever the agent likes.
    let required_matches: Vec<UnitMatch> =
        required.iter().map(|(_, m)| (*m).clone()).collect();
    let sequence_errors = sequence::align(&required_matches);
    let matched_count = required_matches
        .iter()
        .filter(|m| m.matched_span.is_some())
        .count();
    let sequence_score = sequence::sequence_score(
        sequence_errors.len(),
        matched_count.saturating_sub(1),
        matched_count,
    );

    let overall_score = WORD_WEIGHT * word_match_percentage
        + PHRASE_WEIGHT * phrase_match_percentage
        + SEQUENCE_WEIGHT * sequence_score
        + SIMILARITY_WEIGHT * similarity_score;

    let threshold = thresholds.for_mode(mode);
    let compliance_passed = overall_score >= threshold;

    let missing_phrases: Vec<String> = required
        .iter()
        .filter(|(_, m)| !m.status.is_hit())
        .map(|(unit, _)| unit.canonical_text.clone())
        .collect();

    let paraphrased_sections: Vec<ParaphrasedSection> = units
        .iter()
        .zip(matches.iter())
        .filter_map(|(unit, m)| match m.status {
            shared_types::MatchStatus::Fuzzy(similarity) => Some(ParaphrasedSection {
                unit_id: unit.id,
                canonical_text: unit.canonical_text.clone(),
                matched_text: m.matched_text.clone().unwrap_or_default(),
                similarity,
            }),
            _ => None,
        })
        .collect();

    let extra_content = uncovered_runs(matches, transcript, transcript_source, config);

    let mut flagged_for_review = false;
    let mut flag_reasons = Vec::new();

    if !missing_phrases.is_empty() {
        flagged_for_review = true;
        flag_reasons.push(format!(
            "Missing {} required phrases",
            missing_phrases.len()
        ));
    }
    if !sequence_errors.is_empty() {
        flagged_for_review = true;
        flag_reasons.push("Phrases out of sequence".to_string());
    }
    if (overall_score - threshold).abs() <= REVIEW_BAND {
        flagged_for_review = true;
        flag_reasons.push(format!(
            "Overall score {overall_score:.1} is within {REVIEW_BAND:.0} points of the {threshold:.0} threshold"
        ));
    }
    if !extra_content.is_empty() {
        flag_reasons.push(format!(
            "Extra content detected ({} unscripted passages)",
            extra_content.len()
        ));
    }
    match mode {
        ComplianceMode::Strict if !paraphrased_sections.is_empty() => {
            flag_reasons
                .push("Paraphrasing detected (strict mode requires exact wording)".to_string());
        }
        ComplianceMode::Fuzzy if paraphrased_sections.len() > PARAPHRASE_ALLOWANCE => {
            flag_reasons.push("Excessive paraphrasing".to_string());
        }
        _ => {}
    }

    ComplianceVerdict {
        overall_score,
        compliance_passed,
        word_match_percentage,
        phrase_match_percentage,
        sequence_score,
        similarity_score,
        missing_phrases,
        paraphrased_sections,
        sequence_errors,
        extra_content,
        levenshtein_distance,
        flagged_for_review,
        flag_reasons,
    }
}

/// Transcript passages no matched unit accounts for.
///
/// Coverage comes from every match span, optional units included; runs of
/// uncovered tokens longer than the noise floor are returned verbatim so
/// possible unauthorized statements are never silently discarded.
fn uncovered_runs(
    matches: &[UnitMatch],
    transcript: &NormalizedText,
    transcript_source: &str,
    config: &EngineConfig,
) -> Vec<String> {
    let token_count = transcript.tokens.len();
    if token_count == 0 {
        return Vec::new();
    }

    let mut covered = vec![false; token_count];
    for m in matches {
        if let Some((start, end)) = m.matched_span {
            for slot in covered.iter_mut().take(end.min(token_count)).skip(start) {
                *slot = true;
            }
        }
    }

    let mut runs = Vec::new();
    let mut run_start: Option<usize> = None;
    for index in 0..=token_count {
        let uncovered = index < token_count && !covered[index];
        match (uncovered, run_start) {
            (true, None) => run_start = Some(index),
            (false, Some(start)) => {
                if index - start > config.extra_content_floor {
                    let span_start = transcript.tokens[start].start;
                    let span_end = transcript.tokens[index - 1].end;
                    runs.push(span_text(transcript_source, span_start, span_end));
                }
                run_start = None;
            }
            _ => {}
        }
    }
    runs
}
