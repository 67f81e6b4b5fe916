//! Parser for Dig-stage collaborator responses.
//!
//! The Dig instruction asks for five three-line blocks (`类别：` /
//! `问题：` / `提示：`). The collaborator's output is free text, so the
//! parser is deliberately forgiving: it scans line by line, accumulates a
//! partial record, and emits it once the next block starts (or input ends)
//! with both category and question present. Anything incomplete is dropped
//! silently: a short or empty result is a degraded answer, not an error.

use scribe_types::{QuestionCategory, SocraticQuestion};

const CATEGORY_MARKER: &str = "类别：";
const QUESTION_MARKER: &str = "问题：";
const HINT_MARKER: &str = "提示：";

#[derive(Default)]
struct Accumulator {
    category: Option<QuestionCategory>,
    question: Option<String>,
    hint: Option<String>,
}

impl Accumulator {
    fn take_complete(&mut self) -> Option<SocraticQuestion> {
        let (category, question) = (self.category, self.question.take()?);
        let record = SocraticQuestion {
            category: category?,
            question,
            hint: self.hint.take(),
        };
        *self = Self::default();
        Some(record)
    }

    fn is_complete(&self) -> bool {
        self.category.is_some() && self.question.is_some()
    }
}

/// Extract structured questions from a raw Dig-stage response.
///
/// Marker-free input yields an empty vector; a trailing record without
/// both category and question is discarded.
#[must_use]
pub fn parse(raw: &str) -> Vec<SocraticQuestion> {
    let mut questions = Vec::new();
    let mut current = Accumulator::default();

    for line in raw.lines() {
        if line.contains(CATEGORY_MARKER) {
            // A category line opens the next block; flush the finished one.
            if current.is_complete() {
                questions.extend(current.take_complete());
            }
            current = Accumulator::default();
            current.category = Some(QuestionCategory::from_marker_line(line));
        } else if let Some(idx) = line.find(QUESTION_MARKER) {
            let text = line[idx + QUESTION_MARKER.len()..].trim();
            if !text.is_empty() {
                current.question = Some(text.to_string());
            }
        } else if let Some(idx) = line.find(HINT_MARKER) {
            let text = line[idx + HINT_MARKER.len()..].trim();
            if !text.is_empty() {
                current.hint = Some(text.to_string());
            }
        }
    }

    if current.is_complete() {
        questions.extend(current.take_complete());
    }

    questions
}

#[cfg(test)]
mod tests {
    use super::parse;
    use scribe_types::QuestionCategory;

    const FIVE_BLOCKS: &str = "\
- 类别：sensory
- 问题：那一刻你听到了什么声音？
- 提示：试着回忆环境中的细微声响
- 类别：emotional
- 问题：你当时的心情是怎样的？
- 提示：从紧张到释然的变化
- 类别：logical
- 问题：事情为什么会发生在那天？
- 提示：想想前因后果
- 类别：perspective
- 问题：妈妈那时在想什么？
- 提示：换一个视角看
- 类别：sensory
- 问题：校门口的空气闻起来怎样？
- 提示：雨后的味道";

    #[test]
    fn five_well_formed_blocks_yield_five_questions() {
        let questions = parse(FIVE_BLOCKS);
        assert_eq!(questions.len(), 5);

        assert_eq!(questions[0].category, QuestionCategory::Sensory);
        assert_eq!(questions[0].question, "那一刻你听到了什么声音？");
        assert_eq!(
            questions[0].hint.as_deref(),
            Some("试着回忆环境中的细微声响")
        );

        assert_eq!(questions[1].category, QuestionCategory::Emotional);
        assert_eq!(questions[2].category, QuestionCategory::Logical);
        assert_eq!(questions[3].category, QuestionCategory::Perspective);
        assert_eq!(questions[4].category, QuestionCategory::Sensory);
        assert_eq!(questions[4].hint.as_deref(), Some("雨后的味道"));
    }

    #[test]
    fn hint_is_optional() {
        let raw = "类别：logical\n问题：为什么？";
        let questions = parse(raw);
        assert_eq!(questions.len(), 1);
        assert!(questions[0].hint.is_none());
    }

    #[test]
    fn marker_free_input_yields_nothing() {
        assert!(parse("AI服务暂时不可用，请稍后再试。").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn trailing_incomplete_record_is_dropped() {
        let raw = "\
类别：sensory
问题：听到了什么？
类别：emotional";
        let questions = parse(raw);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "听到了什么？");
    }

    #[test]
    fn question_without_category_is_dropped() {
        let raw = "问题：孤零零的问题？\n提示：没有类别";
        assert!(parse(raw).is_empty());
    }

    #[test]
    fn prose_between_blocks_is_ignored() {
        let raw = "\
下面是我的追问：

- 类别：emotional
- 问题：你害怕过吗？
- 提示：想想手心的汗

希望对你有帮助！";
        let questions = parse(raw);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].category, QuestionCategory::Emotional);
        assert_eq!(questions[0].hint.as_deref(), Some("想想手心的汗"));
    }
}
