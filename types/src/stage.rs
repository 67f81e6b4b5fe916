//! The three cognitive stages and the Socratic question shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One phase of the guided-writing workflow.
///
/// A stage is purely a selector for which prompt template and response
/// shape apply; it carries no state beyond the single call's arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CognitiveStage {
    /// Divergent prompting: widen the learner's angles on the topic.
    Spark,
    /// Socratic follow-up questions: press for concrete detail.
    Dig,
    /// Critical revision feedback on a full draft.
    Refine,
}

#[derive(Debug, Error)]
#[error("unknown cognitive stage: {0}")]
pub struct StageParseError(pub String);

impl CognitiveStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CognitiveStage::Spark => "spark",
            CognitiveStage::Dig => "dig",
            CognitiveStage::Refine => "refine",
        }
    }

    pub fn parse(s: &str) -> Result<Self, StageParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spark" => Ok(CognitiveStage::Spark),
            "dig" => Ok(CognitiveStage::Dig),
            "refine" => Ok(CognitiveStage::Refine),
            other => Err(StageParseError(other.to_string())),
        }
    }

    #[must_use]
    pub fn all() -> &'static [CognitiveStage] {
        &[
            CognitiveStage::Spark,
            CognitiveStage::Dig,
            CognitiveStage::Refine,
        ]
    }
}

/// Category of a Socratic follow-up question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Sensory,
    Emotional,
    Logical,
    Perspective,
}

impl QuestionCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionCategory::Sensory => "sensory",
            QuestionCategory::Emotional => "emotional",
            QuestionCategory::Logical => "logical",
            QuestionCategory::Perspective => "perspective",
        }
    }

    /// Classify a category line from a Dig-stage response.
    ///
    /// Mirrors the response format's contract: any line that names none of
    /// the first three categories is a perspective question.
    #[must_use]
    pub fn from_marker_line(line: &str) -> Self {
        if line.contains("sensory") {
            QuestionCategory::Sensory
        } else if line.contains("emotional") {
            QuestionCategory::Emotional
        } else if line.contains("logical") {
            QuestionCategory::Logical
        } else {
            QuestionCategory::Perspective
        }
    }
}

/// One parsed follow-up question from a Dig-stage response.
///
/// Created fresh per parse; discarded once the learner answers or skips it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocraticQuestion {
    pub category: QuestionCategory,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}
