//! Word Error Rate (WER) scoring.
//!
//! WER = (substitutions + deletions + insertions) / reference_word_count,
//! computed from a word-level Levenshtein alignment. Words are split on
//! whitespace; no other transformation is applied here.

use serde::{Deserialize, Serialize};

/// Error counts from aligning a hypothesis against a reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordErrorMeasures {
    pub hits: usize,
    pub substitutions: usize,
    pub deletions: usize,
    pub insertions: usize,
    pub reference_words: usize,
}

impl WordErrorMeasures {
    pub fn errors(&self) -> usize {
        self.substitutions + self.deletions + self.insertions
    }

    /// Error ratio. Not capped at 1.0: a long hypothesis against a short
    /// reference can exceed it. An empty reference scores 0.0 against an
    /// empty hypothesis and 1.0 otherwise.
    pub fn wer(&self) -> f64 {
        if self.reference_words == 0 {
            return if self.insertions == 0 { 0.0 } else { 1.0 };
        }
        self.errors() as f64 / self.reference_words as f64
    }
}

/// Align `hypothesis` against `reference` and count each kind of error.
pub fn measures(reference: &str, hypothesis: &str) -> WordErrorMeasures {
    let ref_words: Vec<&str> = reference.split_whitespace().collect();
    let hyp_words: Vec<&str> = hypothesis.split_whitespace().collect();
    let ref_len = ref_words.len();
    let hyp_len = hyp_words.len();

    // dp[i][j] = edit distance between the first i reference words and the first j hypothesis words
    let mut dp = vec![vec![0usize; hyp_len + 1]; ref_len + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=hyp_len {
        dp[0][j] = j;
    }

    for i in 1..=ref_len {
        for j in 1..=hyp_len {
            let substitution_cost = usize::from(ref_words[i - 1] != hyp_words[j - 1]);
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + substitution_cost);
        }
    }

    let mut result = WordErrorMeasures {
        reference_words: ref_len,
        ..Default::default()
    };

    let (mut i, mut j) = (ref_len, hyp_len);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && ref_words[i - 1] == hyp_words[j - 1] && dp[i][j] == dp[i - 1][j - 1]
        {
            result.hits += 1;
            i -= 1;
            j -= 1;
        } else if i > 0 && j > 0 && dp[i][j] == dp[i - 1][j - 1] + 1 {
            result.substitutions += 1;
            i -= 1;
            j -= 1;
        } else if i > 0 && dp[i][j] == dp[i - 1][j] + 1 {
            result.deletions += 1;
            i -= 1;
        } else {
            result.insertions += 1;
            j -= 1;
        }
    }

    result
}

/// Calculate Word Error Rate between reference and hypothesis strings.
pub fn word_error_rate(reference: &str, hypothesis: &str) -> f64 {
    measures(reference, hypothesis).wer()
}

/// Format WER as a percentage string with two decimals.
pub fn format_wer_percentage(wer: f64) -> String {
    format!("{:.2}%", wer * 100.0)
}
