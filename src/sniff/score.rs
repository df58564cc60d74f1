//! Scoring of candidate dialects.
//!
//! The gamma score combines two uniformity measures with bonuses and
//! penalties:
//! - `tau_0` (consistency): 1 / (1 + 2 * sigma) over the field counts
//! - `tau_1` (dispersion): range, transitions and modal dominance
//! - bonuses for multi-field, multi-row tables
//! - penalties for rare delimiters and tiny samples

use std::cmp::Ordering;

use super::candidates::Candidate;
use super::table::{FieldCounts, profile_sample};
use crate::metadata::Quote;

/// Quote character counts, computed once per sample.
#[derive(Debug, Clone, Copy)]
struct QuoteCounts {
    double: usize,
    single: usize,
    data_len: usize,
}

impl QuoteCounts {
    fn new(data: &[u8]) -> Self {
        Self {
            double: bytecount::count(data, b'"'),
            single: bytecount::count(data, b'\''),
            data_len: data.len(),
        }
    }
}

/// Score result for a candidate.
#[derive(Debug, Clone)]
pub struct CandidateScore {
    pub candidate: Candidate,
    /// Combined score (higher is better).
    pub gamma: f64,
    /// Modal field count.
    pub num_fields: usize,
    pub is_uniform: bool,
}

/// Score every candidate against the sample.
pub fn score_candidates(data: &[u8], candidates: &[Candidate]) -> Vec<CandidateScore> {
    let quote_counts = QuoteCounts::new(data);

    candidates
        .iter()
        .map(|candidate| {
            let profile = profile_sample(data, candidate);
            let gamma = if profile.is_empty() {
                0.0
            } else {
                compute_gamma(&profile, candidate.delimiter)
                    * quote_evidence(&quote_counts, candidate.quote)
            };
            CandidateScore {
                candidate: *candidate,
                gamma,
                num_fields: profile.modal(),
                is_uniform: profile.is_uniform(),
            }
        })
        .collect()
}

/// Calculate `tau_0` (consistency score), between 0 and 1.
pub fn calculate_tau_0(profile: &FieldCounts) -> f64 {
    if profile.is_empty() {
        return 0.0;
    }
    1.0 / 2.0f64.mul_add(standard_deviation(&profile.counts), 1.0)
}

/// Calculate `tau_1` (dispersion score), between 0 and 1 where 1 means low
/// dispersion.
pub fn calculate_tau_1(profile: &FieldCounts) -> f64 {
    let n = profile.num_rows();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return 1.0;
    }

    let max_fc = profile.max();
    let range = max_fc - profile.min();
    let range_score = if max_fc == 0 {
        0.0
    } else {
        1.0 - (range as f64 / max_fc as f64).min(1.0)
    };

    let transitions = profile.counts.windows(2).filter(|w| w[0] != w[1]).count();
    let transition_score = 1.0 - (transitions as f64 / (n - 1) as f64);

    let mode_score = profile.modal_freq() as f64 / n as f64;

    mode_score.mul_add(0.4, range_score * 0.3 + transition_score * 0.3)
}

fn standard_deviation(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<usize>() as f64 / n;
    let variance = values
        .iter()
        .map(|&v| {
            let diff = v as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;

    variance.sqrt()
}

fn compute_gamma(profile: &FieldCounts, delimiter: u8) -> f64 {
    let uniformity = (calculate_tau_0(profile) * calculate_tau_1(profile)).sqrt();

    let num_rows = profile.num_rows();
    let row_bonus = (num_rows.min(20) as f64 / 20.0) * 0.1;

    let field_count = profile.modal();
    let field_bonus = if field_count >= 2 {
        (field_count.min(10) as f64 / 10.0) * 0.2
    } else {
        0.0
    };

    let single_field_penalty = if field_count == 1 { 0.5 } else { 1.0 };
    let high_field_penalty = if field_count > 100 {
        0.5
    } else if field_count > 50 {
        0.8
    } else {
        1.0
    };
    let small_sample_penalty = if num_rows < 3 {
        0.70
    } else if num_rows < 5 {
        0.85
    } else {
        1.0
    };

    let delimiter_penalty = match delimiter {
        b',' | b';' | b'\t' => 1.0,
        b'|' => 0.98,
        b' ' => 0.75,
        b'^' | b'~' => 0.80,
        b'/' => 0.65,
        b'#' | b'&' => 0.60,
        _ => 0.70,
    };

    let raw = uniformity.mul_add(0.7, row_bonus) + field_bonus;
    raw * single_field_penalty * high_field_penalty * delimiter_penalty * small_sample_penalty
}

/// Multiplier from the density of quote characters in the sample.
///
/// Conservative with single quotes: apostrophes in text ("John's") are
/// common and don't indicate quoting.
fn quote_evidence(counts: &QuoteCounts, quote: Quote) -> f64 {
    if counts.data_len == 0 {
        return 1.0;
    }

    // quotes per 1000 bytes; 5 = 0.5%
    let double_density = (counts.double * 1000) / counts.data_len;
    let single_density = (counts.single * 1000) / counts.data_len;
    let threshold = 5;

    match quote {
        Quote::Some(b'"') if double_density >= threshold => 1.03,
        Quote::Some(b'\'') => {
            if single_density >= threshold * 2 && double_density < threshold {
                1.05
            } else if double_density >= threshold {
                0.95
            } else {
                1.0
            }
        }
        Quote::None if double_density >= threshold => 0.90,
        _ => 1.0,
    }
}

/// Pick the best candidate.
///
/// When every candidate yields single-field rows, the comma wins. Scores
/// within 10% of each other are decided by delimiter priority, then quote
/// priority.
pub fn find_best(scores: &[CandidateScore]) -> Option<&CandidateScore> {
    let viable = || scores.iter().filter(|s| s.gamma > 0.0);
    let all_single_field = viable().all(|s| s.num_fields <= 1);

    viable().max_by(|a, b| {
        let by_priority = delimiter_priority(a.candidate.delimiter)
            .cmp(&delimiter_priority(b.candidate.delimiter))
            .then_with(|| {
                quote_priority(a.candidate.quote).cmp(&quote_priority(b.candidate.quote))
            });

        if all_single_field {
            return by_priority;
        }

        let ratio = if a.gamma > b.gamma {
            b.gamma / a.gamma
        } else {
            a.gamma / b.gamma
        };

        if ratio > 0.90 {
            by_priority.then_with(|| a.gamma.partial_cmp(&b.gamma).unwrap_or(Ordering::Equal))
        } else {
            a.gamma.partial_cmp(&b.gamma).unwrap_or(Ordering::Equal)
        }
    })
}

/// Higher is preferred.
const fn delimiter_priority(delimiter: u8) -> u8 {
    match delimiter {
        b',' => 10,
        b';' => 9,
        b'\t' => 8,
        b'|' => 7,
        b'^' | b'~' => 3,
        b'/' | b' ' => 2,
        b'#' | b'&' => 1,
        _ => 0,
    }
}

/// Double quote is the standard default.
const fn quote_priority(quote: Quote) -> u8 {
    match quote {
        Quote::Some(b'"') => 3,
        Quote::Some(b'\'') => 2,
        Quote::None => 1,
        Quote::Some(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniff::candidates::generate_candidates;

    #[test]
    fn test_tau_uniform() {
        let profile = FieldCounts::from_counts(vec![3, 3, 3, 3, 3]);
        assert!((calculate_tau_0(&profile) - 1.0).abs() < 0.001);
        assert!((calculate_tau_1(&profile) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_tau_0_varied() {
        let profile = FieldCounts::from_counts(vec![3, 4, 3, 5, 3]);
        let tau_0 = calculate_tau_0(&profile);
        assert!(tau_0 < 1.0);
        assert!(tau_0 > 0.0);
    }

    #[test]
    fn test_wrong_delimiter_lower_score() {
        let data = b"a,b,c\n1,2,3\n4,5,6\n";
        let scores = score_candidates(
            data,
            &[
                Candidate::new(b',', Quote::Some(b'"')),
                Candidate::new(b';', Quote::Some(b'"')),
            ],
        );
        assert!(scores[0].gamma > scores[1].gamma);
        assert_eq!(scores[0].num_fields, 3);
        assert!(scores[0].is_uniform);
    }

    #[test]
    fn test_find_best_semicolon() {
        let data = b"name;age;city\nAlice;30;NYC\nBob;25;LA\n";
        let scores = score_candidates(data, &generate_candidates(None));
        let best = find_best(&scores).unwrap();
        assert_eq!(best.candidate.delimiter, b';');
        assert_eq!(best.candidate.quote, Quote::Some(b'"'));
    }

    #[test]
    fn test_single_field_prefers_comma() {
        let data = b"title\nalpha\nbeta\n";
        let scores = score_candidates(data, &generate_candidates(None));
        let best = find_best(&scores).unwrap();
        assert_eq!(best.candidate.delimiter, b',');
    }
}
