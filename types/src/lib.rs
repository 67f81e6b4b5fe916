//! Core domain types for Scribe.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application: the guidance engine reads these types, the presentation
//! layer owns and persists them.

mod echo;
mod ladder;
mod session;
mod stage;

pub use echo::{ExerciseSkeleton, FillInTheBlank, SimilarityResult};
pub use ladder::{ExampleKind, GuidanceBucket, InspirationLevel, LadderSteps, WorkedExample};
pub use session::{ChatRole, SessionContext, TranscriptMessage};
pub use stage::{CognitiveStage, QuestionCategory, SocraticQuestion, StageParseError};
