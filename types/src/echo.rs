//! Results of echo detection and the remedial exercise shapes.

use serde::{Deserialize, Serialize};

/// Outcome of checking learner text against model-generated examples.
///
/// Produced fresh per check; the engine never stores one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// True when the best match strictly exceeds the echo threshold.
    pub is_echo: bool,
    /// Best cosine similarity over all candidates, in `[0, 1]`.
    pub score: f64,
    /// The candidate that produced the best score, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_example: Option<String>,
}

impl SimilarityResult {
    /// The degenerate result for an empty candidate list.
    #[must_use]
    pub fn no_match() -> Self {
        Self {
            is_echo: false,
            score: 0.0,
            matched_example: None,
        }
    }
}

/// A sentence-skeleton rewrite exercise.
///
/// Invariant: substituting the blank markers in `skeleton`, in order, with
/// the values in `blanks` reproduces the source sentence exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSkeleton {
    /// The sentence with key content words replaced by blank markers.
    pub skeleton: String,
    /// The replaced values, in order of appearance.
    pub blanks: Vec<String>,
    /// Instruction shown alongside the exercise.
    pub hint: String,
}

/// A multiple-choice fill-in-the-blank exercise, the fallback after
/// repeated failed rewrite attempts.
///
/// Invariant: for every blank `i`, `options[i][answer[i]]` equals the token
/// that originally occupied that position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillInTheBlank {
    /// The sentence with numbered blank markers.
    pub sentence: String,
    /// One candidate option set per blank, in blank-number order.
    pub options: Vec<Vec<String>>,
    /// Index of the correct option within each option set.
    pub answer: Vec<usize>,
}
