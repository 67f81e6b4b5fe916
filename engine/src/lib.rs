//! The Cognitive Guidance Engine.
//!
//! # Architecture
//!
//! A three-phase tutoring workflow over one external collaborator:
//!
//! ```text
//! SessionContext --> compose(stage) --> TextGenerator --> raw text
//!                                                          |
//!                                   Dig only: parser --> Vec<SocraticQuestion>
//! ```
//!
//! - [`compose`] - Instruction templates for Spark / Dig / Refine
//! - [`parser`] - Structured questions out of Dig-stage responses
//! - [`ladder`] - The three-level Inspiration Ladder for stuck learners
//! - [`echo`] - Echo detection and remedial exercise generation
//! - [`config`] - `~/.scribe/config.toml` loading
//! - [`CognitiveEngine`] - The orchestrator tying it together
//!
//! # Statelessness
//!
//! Every operation is a pure function of its explicit arguments plus one
//! collaborator call. The engine holds no session state and never mutates
//! the [`SessionContext`] it is handed; overlapping calls proceed
//! independently and sequencing is the caller's concern.
//!
//! # Degradation, not errors
//!
//! Guidance must never crash a writing session. A collaborator failure
//! becomes the fixed [`SERVICE_UNAVAILABLE_FALLBACK`] string; an
//! unparseable Dig response becomes a short or empty question list. No
//! staged operation returns a `Result`.

pub mod compose;
pub mod config;
pub mod echo;
pub mod ladder;
pub mod parser;

pub use compose::MENTOR_SYSTEM_PROMPT;
pub use config::ScribeConfig;
pub use echo::EchoDetector;

use scribe_providers::{GenerationRequest, TextGenerator};
use scribe_types::{CognitiveStage, SessionContext, SocraticQuestion, TranscriptMessage};

/// Returned in place of generated text when the collaborator fails.
pub const SERVICE_UNAVAILABLE_FALLBACK: &str = "AI服务暂时不可用，请稍后再试。";

/// Orchestrates the staged tutoring workflow over a [`TextGenerator`].
#[derive(Debug, Clone)]
pub struct CognitiveEngine<G> {
    generator: G,
}

impl<G: TextGenerator> CognitiveEngine<G> {
    #[must_use]
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Spark: divergent prompting over the topic and collected materials.
    pub async fn spark(&self, ctx: &SessionContext) -> String {
        let prompt = compose::compose(CognitiveStage::Spark, ctx);
        self.dispatch(CognitiveStage::Spark, &prompt).await
    }

    /// Dig: Socratic follow-up questions over the most recently collected
    /// material. A failed call or an unparseable response yields an empty
    /// or short list, never an error.
    pub async fn dig(&self, ctx: &SessionContext) -> Vec<SocraticQuestion> {
        let prompt = compose::compose(CognitiveStage::Dig, ctx);
        self.dig_with_prompt(&prompt).await
    }

    /// Dig over a material fragment the caller holds outside the context.
    pub async fn dig_material(&self, material: &str) -> Vec<SocraticQuestion> {
        let prompt = compose::dig_prompt(material);
        self.dig_with_prompt(&prompt).await
    }

    async fn dig_with_prompt(&self, prompt: &str) -> Vec<SocraticQuestion> {
        let raw = self.dispatch(CognitiveStage::Dig, prompt).await;
        let questions = parser::parse(&raw);
        if questions.len() < 5 {
            tracing::warn!(
                parsed = questions.len(),
                "Dig response yielded fewer than five questions"
            );
        }
        questions
    }

    /// Refine: structured critique of the draft in the context.
    pub async fn refine(&self, ctx: &SessionContext) -> String {
        let prompt = compose::compose(CognitiveStage::Refine, ctx);
        self.dispatch(CognitiveStage::Refine, &prompt).await
    }

    /// Compress a session transcript into a short summary.
    pub async fn summarize(&self, transcript: &[TranscriptMessage]) -> String {
        let prompt = compose::summarize_prompt(transcript);
        self.dispatch(CognitiveStage::Spark, &prompt).await
    }

    async fn dispatch(&self, stage: CognitiveStage, prompt: &str) -> String {
        let request = GenerationRequest {
            system: Some(MENTOR_SYSTEM_PROMPT),
            prompt,
            stage,
        };
        match self.generator.generate(request).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    stage = stage.as_str(),
                    error = %e,
                    "Collaborator call failed; substituting fallback"
                );
                SERVICE_UNAVAILABLE_FALLBACK.to_string()
            }
        }
    }
}
