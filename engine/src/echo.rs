//! Echo detection and remedial exercise generation.
//!
//! "Echo" is learner output that is a near-verbatim reuse of a
//! model-generated example. Detection is a cheap, local bag-of-characters
//! comparison so it can run on every draft submission without a
//! collaborator round-trip. On detection the caller offers the learner a
//! skeleton rewrite exercise, and after repeated failed rewrites the
//! multiple-choice fill-in-the-blank fallback.

use rand::Rng;
use rand::RngExt;
use regex::Regex;
use scribe_types::{ExerciseSkeleton, FillInTheBlank, SimilarityResult};
use std::collections::HashMap;
use std::sync::OnceLock;
use unicode_script::{Script, UnicodeScript};

/// Similarity above which learner text counts as an echo (strict).
pub const ECHO_THRESHOLD: f64 = 0.8;

const BLANK_MARKER: &str = "【____】";

const SKELETON_HINT: &str = "请根据句式骨架，用自己的素材填充空白处，保持句式但改变内容。";

/// Reduce text to comparable atomic units: one entry per Han character.
///
/// Punctuation, Latin letters, digits, and whitespace are all dropped.
/// Pure and deterministic; empty input yields an empty sequence.
#[must_use]
pub fn tokenize(text: &str) -> Vec<char> {
    text.chars().filter(|c| c.script() == Script::Han).collect()
}

fn frequency(units: &[char]) -> HashMap<char, u32> {
    let mut freq = HashMap::new();
    for unit in units {
        *freq.entry(*unit).or_insert(0) += 1;
    }
    freq
}

fn dot(a: &HashMap<char, u32>, b: &HashMap<char, u32>) -> f64 {
    a.iter()
        .filter_map(|(unit, count)| b.get(unit).map(|other| f64::from(*count) * f64::from(*other)))
        .sum()
}

/// Cosine similarity of the two texts' character-frequency vectors.
///
/// Returns 0.0 when either tokenized text is empty. Symmetric, and bounded
/// to `[0, 1]`. Frequency-only: word order does not affect the score.
#[must_use]
pub fn score(a: &str, b: &str) -> f64 {
    let units_a = tokenize(a);
    let units_b = tokenize(b);
    if units_a.is_empty() || units_b.is_empty() {
        return 0.0;
    }

    let freq_a = frequency(&units_a);
    let freq_b = frequency(&units_b);

    let magnitude_a = dot(&freq_a, &freq_a).sqrt();
    let magnitude_b = dot(&freq_b, &freq_b).sqrt();
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot(&freq_a, &freq_b) / (magnitude_a * magnitude_b)
}

/// Flags near-verbatim reuse of model-generated examples.
#[derive(Debug, Clone)]
pub struct EchoDetector {
    threshold: f64,
}

impl Default for EchoDetector {
    fn default() -> Self {
        Self {
            threshold: ECHO_THRESHOLD,
        }
    }
}

impl EchoDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare learner text against every candidate example and keep the
    /// best match. `is_echo` requires the score to strictly exceed the
    /// threshold; an empty candidate list is never an echo.
    #[must_use]
    pub fn check(&self, learner_text: &str, examples: &[String]) -> SimilarityResult {
        let mut best = 0.0_f64;
        let mut matched: Option<&String> = None;

        for example in examples {
            let similarity = score(learner_text, example);
            if similarity > best {
                best = similarity;
                matched = Some(example);
            }
        }

        SimilarityResult {
            is_echo: best > self.threshold,
            score: best,
            matched_example: matched.cloned(),
        }
    }
}

/// Subject/entity pattern class: numeral runs, seasonal nouns, pronoun runs.
fn subject_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new("[一二三四五六七八九十百千万零]+|[春夏秋冬]+|[天地人你我他她它们]+")
            .expect("subject pattern is valid")
    })
}

/// Predicate pattern class: a closed list of common verbs and adjectives.
fn predicate_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            "跑|走|跳|吃|喝|睡|看|听|说|想|做|写|读|学|爱|喜欢|高兴|难过|害怕|紧张|感动|流泪|\
             拥抱|微笑|大笑|哭泣|奔跑|跳跃|飞翔|游泳|唱歌|跳舞|弹琴|画画|写字|读书|学习|工作|\
             生活|成长|变化|进步|成功|失败|坚持|放弃|努力|奋斗|拼搏|梦想|希望|未来|过去|现在|\
             今天|明天|昨天|早晨|中午|下午|晚上|深夜|凌晨",
        )
        .expect("predicate pattern is valid")
    })
}

/// A span claimed for blanking, in byte offsets into the source sentence.
struct Claim {
    start: usize,
    end: usize,
    /// Lower value wins when two classes match at the same start.
    priority: u8,
}

fn collect_claims(sentence: &str) -> Vec<Claim> {
    let mut claims = Vec::new();
    for (priority, pattern) in [(0u8, subject_pattern()), (1u8, predicate_pattern())] {
        for m in pattern.find_iter(sentence) {
            // Single-character hits stay in place; only runs are blanked.
            if m.as_str().chars().count() > 1 {
                claims.push(Claim {
                    start: m.start(),
                    end: m.end(),
                    priority,
                });
            }
        }
    }

    claims.sort_by_key(|c| (c.start, c.priority));

    // Left-to-right claiming: a match overlapping an already-claimed span
    // is dropped, so no span is blanked twice.
    let mut accepted: Vec<Claim> = Vec::new();
    for claim in claims {
        let overlaps = accepted
            .iter()
            .any(|prior| claim.start < prior.end && claim.end > prior.start);
        if !overlaps {
            accepted.push(claim);
        }
    }
    accepted
}

/// Build a skeleton rewrite exercise from a sentence.
///
/// Each matched span becomes a blank marker, with the replaced text
/// collected in order of appearance. Substituting `blanks` back into the
/// markers, in order, reproduces the sentence exactly. An empty sentence
/// yields an empty skeleton.
#[must_use]
pub fn skeleton(sentence: &str) -> ExerciseSkeleton {
    let claims = collect_claims(sentence);

    let mut result = String::with_capacity(sentence.len());
    let mut blanks = Vec::with_capacity(claims.len());
    let mut cursor = 0;

    for claim in &claims {
        result.push_str(&sentence[cursor..claim.start]);
        result.push_str(BLANK_MARKER);
        blanks.push(sentence[claim.start..claim.end].to_string());
        cursor = claim.end;
    }
    result.push_str(&sentence[cursor..]);

    ExerciseSkeleton {
        skeleton: result,
        blanks,
        hint: SKELETON_HINT.to_string(),
    }
}

/// Closed synonym table for fill-in-the-blank distractor options.
fn synonyms(word: char) -> Option<&'static [&'static str]> {
    match word {
        '跑' => Some(&["奔跑", "疾走", "飞奔"]),
        '说' => Some(&["讲", "谈", "道"]),
        '看' => Some(&["望", "瞧", "瞥"]),
        '走' => Some(&["行", "迈", "踱"]),
        '哭' => Some(&["泣", "啼", "嚎"]),
        '笑' => Some(&["乐", "哂", "嘻"]),
        _ => None,
    }
}

fn pick_synonym(word: char, rng: &mut impl Rng) -> Option<String> {
    synonyms(word).map(|options| options[rng.random_range(0..options.len())].to_string())
}

/// Build the multiple-choice fallback exercise.
///
/// Blank count is `min(3, token_count / 5)`; positions are sampled without
/// replacement, so blanks are always distinct. Each option set lists the
/// original token first (the correct answer is always index 0), padded
/// with synonyms or the fixed placeholder words.
pub fn fill_in_blank(sentence: &str, rng: &mut impl Rng) -> FillInTheBlank {
    let tokens = tokenize(sentence);
    let blank_count = usize::min(3, tokens.len() / 5);

    let positions: Vec<usize> = if blank_count == 0 {
        Vec::new()
    } else {
        rand::seq::index::sample(rng, tokens.len(), blank_count).into_vec()
    };

    let mut options = Vec::with_capacity(blank_count);
    for &pos in &positions {
        let token = tokens[pos];
        options.push(vec![
            token.to_string(),
            pick_synonym(token, rng).unwrap_or_else(|| "其他词1".to_string()),
            pick_synonym(token, rng).unwrap_or_else(|| "其他词2".to_string()),
        ]);
    }

    let sentence: String = tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            positions
                .iter()
                .position(|&p| p == index)
                .map_or_else(|| token.to_string(), |n| format!("【第{}空】", n + 1))
        })
        .collect();

    let answer = vec![0; positions.len()];

    FillInTheBlank {
        sentence,
        options,
        answer,
    }
}
