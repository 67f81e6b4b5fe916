//! Types for the three-level Inspiration Ladder.
//!
//! The level counter is held by the caller, not the engine: it advances when
//! the learner asks for more help and resets to [`InspirationLevel::One`] on
//! any observed activity.

use serde::{Deserialize, Serialize};

/// Escalation level of the Inspiration Ladder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InspirationLevel {
    /// Direction hint: a nudge toward an angle, never a sentence.
    #[default]
    One,
    /// Worked comparison: a basic vs. advanced rendering of one technique.
    Two,
    /// Technique explanation: why the advanced rendering works.
    Three,
}

impl InspirationLevel {
    /// Advance one level, saturating at [`InspirationLevel::Three`].
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            InspirationLevel::One => InspirationLevel::Two,
            InspirationLevel::Two | InspirationLevel::Three => InspirationLevel::Three,
        }
    }

    /// Back to level one. The caller invokes this on any learner activity.
    #[must_use]
    pub fn reset(self) -> Self {
        InspirationLevel::One
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            InspirationLevel::One => 1,
            InspirationLevel::Two => 2,
            InspirationLevel::Three => 3,
        }
    }
}

/// Guidance bucket for Level 1 direction hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceBucket {
    Environment,
    Emotion,
    Character,
    Detail,
    Dialogue,
}

/// Kind of a Level 2 worked example. Writing-technique taxonomy of the
/// five built-in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExampleKind {
    /// 环境描写
    Environment,
    /// 情感表达
    Emotion,
    /// 动作描写
    Action,
    /// 心理描写
    Psychology,
    /// 对话描写
    Dialogue,
}

impl ExampleKind {
    /// Chinese display name, as shown to the learner.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            ExampleKind::Environment => "环境描写",
            ExampleKind::Emotion => "情感表达",
            ExampleKind::Action => "动作描写",
            ExampleKind::Psychology => "心理描写",
            ExampleKind::Dialogue => "对话描写",
        }
    }
}

/// A Level 2 basic-vs-advanced worked comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedExample {
    pub kind: ExampleKind,
    pub basic: String,
    pub advanced: String,
}

/// All three ladder steps produced at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderSteps {
    pub guidance: String,
    pub example: WorkedExample,
    pub analysis: String,
}

#[cfg(test)]
mod tests {
    use super::InspirationLevel;

    #[test]
    fn level_advances_and_saturates() {
        let level = InspirationLevel::default();
        assert_eq!(level, InspirationLevel::One);
        assert_eq!(level.next(), InspirationLevel::Two);
        assert_eq!(level.next().next(), InspirationLevel::Three);
        assert_eq!(level.next().next().next(), InspirationLevel::Three);
    }

    #[test]
    fn reset_returns_to_level_one_from_anywhere() {
        assert_eq!(InspirationLevel::Three.reset(), InspirationLevel::One);
        assert_eq!(InspirationLevel::One.reset(), InspirationLevel::One);
    }

    #[test]
    fn numeric_view_matches_levels() {
        assert_eq!(InspirationLevel::One.as_u8(), 1);
        assert_eq!(InspirationLevel::Two.as_u8(), 2);
        assert_eq!(InspirationLevel::Three.as_u8(), 3);
    }
}
