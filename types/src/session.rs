//! Caller-owned writing-session state.
//!
//! The engine receives a [`SessionContext`] by shared reference and never
//! mutates it; every mutator here exists for the presentation layer, which
//! owns the session lifecycle (load at start, save on change, clear on
//! reset).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the engine needs to know about one essay-in-progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// The assigned essay topic.
    pub topic: String,
    /// Keywords the learner has collected, in collection order.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Material fragments the learner has collected, in collection order.
    #[serde(default)]
    pub materials: Vec<String>,
    /// Structure slots, keyed by slot id, holding the learner's filled text.
    #[serde(default)]
    pub structure: BTreeMap<String, String>,
    /// Current draft text.
    #[serde(default)]
    pub draft: String,
    /// Polished (post-revision) text.
    #[serde(default)]
    pub polished: String,
}

impl SessionContext {
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    /// Append a collected keyword. Keywords are append-only.
    pub fn add_keyword(&mut self, keyword: impl Into<String>) {
        self.keywords.push(keyword.into());
    }

    /// Append a collected material fragment. Materials are append-only.
    pub fn add_material(&mut self, material: impl Into<String>) {
        self.materials.push(material.into());
    }

    /// Fill a structure slot, replacing any previous content for that slot.
    pub fn fill_slot(&mut self, slot_id: impl Into<String>, text: impl Into<String>) {
        self.structure.insert(slot_id.into(), text.into());
    }

    /// The most recently collected material, if any.
    #[must_use]
    pub fn latest_material(&self) -> Option<&str> {
        self.materials.last().map(String::as_str)
    }
}

/// Role of one message in a session transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One exchanged message, kept by the caller for session summarization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: ChatRole,
    pub content: String,
}

impl TranscriptMessage {
    #[must_use]
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatRole, SessionContext, TranscriptMessage};

    #[test]
    fn new_context_has_only_topic() {
        let ctx = SessionContext::new("那一刻，我长大了");
        assert_eq!(ctx.topic, "那一刻，我长大了");
        assert!(ctx.keywords.is_empty());
        assert!(ctx.materials.is_empty());
        assert!(ctx.structure.is_empty());
        assert!(ctx.draft.is_empty());
    }

    #[test]
    fn materials_keep_collection_order() {
        let mut ctx = SessionContext::new("topic");
        ctx.add_material("第一条");
        ctx.add_material("第二条");
        assert_eq!(ctx.materials, vec!["第一条", "第二条"]);
        assert_eq!(ctx.latest_material(), Some("第二条"));
    }

    #[test]
    fn fill_slot_replaces_previous_content() {
        let mut ctx = SessionContext::new("topic");
        ctx.fill_slot("opening", "初稿");
        ctx.fill_slot("opening", "修改稿");
        assert_eq!(ctx.structure.get("opening").map(String::as_str), Some("修改稿"));
    }

    #[test]
    fn context_round_trips_through_serde() {
        let mut ctx = SessionContext::new("题目");
        ctx.add_keyword("成长");
        ctx.add_material("那天放学");
        let json = serde_json::to_string(&ctx).unwrap();
        let back: SessionContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }

    #[test]
    fn chat_role_serializes_lowercase() {
        let msg = TranscriptMessage::new(ChatRole::Assistant, "hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"assistant\""));
    }
}
