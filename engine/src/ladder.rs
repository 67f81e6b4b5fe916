//! The Inspiration Ladder: three escalating levels of unstick-help.
//!
//! The caller owns the level counter and the idle timer; this module only
//! produces the hint for whichever level the caller has reached. Every
//! choice point takes the caller's `Rng`, so a seeded generator makes the
//! output fully deterministic under test.

use rand::Rng;
use rand::RngExt;
use scribe_types::{ExampleKind, GuidanceBucket, LadderSteps, WorkedExample};

/// Level 1 option lists, one per guidance bucket.
fn bucket_options(bucket: GuidanceBucket) -> &'static [&'static str] {
    match bucket {
        GuidanceBucket::Environment => &[
            "试试描写周围的环境氛围？",
            "当时的光线、温度、气味是怎样的？",
        ],
        GuidanceBucket::Emotion => &[
            "能说说你当时的心情吗？",
            "这个瞬间给你带来了什么感受？",
        ],
        GuidanceBucket::Character => &[
            "其他人在做什么？他们的表情如何？",
            "你能从他人的角度看看这件事吗？",
        ],
        GuidanceBucket::Detail => &[
            "能否加入一些具体的动作描写？",
            "试着用五感来描述这个场景",
        ],
        GuidanceBucket::Dialogue => &[
            "他们说了什么？语气是怎样的？",
            "对话中有什么特别的词或语气？",
        ],
    }
}

/// Fallback options when no bucket keyword matches the context.
const DEFAULT_OPTIONS: &[&str] = &[
    "试试从环境描写入手？",
    "加入人物的内心独白如何？",
    "这个场景最打动你的细节是什么？",
];

/// Classify a context string into a guidance bucket by keyword match.
///
/// Buckets are tried in a fixed order; the first keyword hit wins.
#[must_use]
pub fn classify_context(context: &str) -> Option<GuidanceBucket> {
    const TABLE: &[(GuidanceBucket, &[&str])] = &[
        (GuidanceBucket::Environment, &["环境", "场景"]),
        (GuidanceBucket::Emotion, &["心情", "感受"]),
        (GuidanceBucket::Character, &["人", "他"]),
        (GuidanceBucket::Detail, &["动作", "细节"]),
        (GuidanceBucket::Dialogue, &["说", "对话"]),
    ];

    TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| context.contains(k)))
        .map(|(bucket, _)| *bucket)
}

/// Level 1: a direction hint. An angle to try, never a ready-made sentence.
pub fn guidance(context: &str, rng: &mut impl Rng) -> String {
    let options = classify_context(context).map_or(DEFAULT_OPTIONS, bucket_options);
    options[rng.random_range(0..options.len())].to_string()
}

/// The five built-in basic-vs-advanced worked comparisons.
fn worked_examples() -> [WorkedExample; 5] {
    [
        WorkedExample {
            kind: ExampleKind::Environment,
            basic: "那天天气很好，阳光明媚。".to_string(),
            advanced: "晨曦如金线般穿透云层，温柔地洒在青石板路上，空气中弥漫着泥土和花草的清新气息。"
                .to_string(),
        },
        WorkedExample {
            kind: ExampleKind::Emotion,
            basic: "我很感动，眼泪流了下来。".to_string(),
            advanced: "一股暖流从心底涌起，视线渐渐模糊，滚烫的泪水无声地滑过脸颊，那一刻，所有的委屈都化作了释然。"
                .to_string(),
        },
        WorkedExample {
            kind: ExampleKind::Action,
            basic: "他跑过来，抱住了我。".to_string(),
            advanced: "他三步并作两步冲过来，双臂紧紧环住我的肩膀，我能感受到他胸膛剧烈的起伏和急促的呼吸。"
                .to_string(),
        },
        WorkedExample {
            kind: ExampleKind::Psychology,
            basic: "我很紧张，心跳很快。".to_string(),
            advanced: "掌心渗出细密的汗珠，喉咙发紧，每一次心跳都像擂鼓般撞击着胸腔，思绪如乱麻般纠缠不清。"
                .to_string(),
        },
        WorkedExample {
            kind: ExampleKind::Dialogue,
            basic: "他说：\"我很高兴。\"".to_string(),
            advanced: "他的嘴角微微上扬，眼中闪烁着欣慰的光芒，声音里带着一丝不易察觉的哽咽：\"这一刻，我等了很久了。\""
                .to_string(),
        },
    ]
}

/// Level 2: pick the worked example whose kind matches the theme keywords,
/// or a uniformly random one when no keyword matches.
pub fn examples(theme: &str, rng: &mut impl Rng) -> WorkedExample {
    let all = worked_examples();

    let wanted: Option<&[ExampleKind]> = if theme.contains("情感") || theme.contains("心情") {
        Some(&[ExampleKind::Emotion, ExampleKind::Psychology])
    } else if theme.contains("环境") || theme.contains("场景") {
        Some(&[ExampleKind::Environment])
    } else if theme.contains("动作") || theme.contains("对话") {
        Some(&[ExampleKind::Action, ExampleKind::Dialogue])
    } else {
        None
    };

    match wanted {
        Some(kinds) => all
            .iter()
            .find(|e| kinds.contains(&e.kind))
            .cloned()
            .unwrap_or_else(|| all[0].clone()),
        None => all[rng.random_range(0..all.len())].clone(),
    }
}

/// Level 3: explain why the advanced rendering of this kind works.
#[must_use]
pub fn analysis(kind: ExampleKind) -> &'static str {
    match kind {
        ExampleKind::Environment => {
            "高阶写法运用了\"以景衬情\"的手法，通过细腻的感官描写（视觉：晨曦如金线；嗅觉：泥土花草气息）营造氛围，让读者身临其境。"
        }
        ExampleKind::Emotion => {
            "避免了直接说\"感动\"，而是通过\"暖流涌起\"、\"视线模糊\"、\"泪水滑落\"等细节描写来表现，符合\"展示而非告知\"的写作原则。"
        }
        ExampleKind::Action => {
            "加入了\"三步并作两步\"、\"紧紧环住\"、\"胸膛起伏\"等具体动作和感受，让人物形象更加生动立体。"
        }
        ExampleKind::Psychology => {
            "用\"掌心出汗\"、\"喉咙发紧\"、\"心跳如鼓\"等身体反应来外化内心紧张，比直接说\"我很紧张\"更有感染力。"
        }
        ExampleKind::Dialogue => {
            "结合了神态（嘴角上扬、眼中闪光）、语气（哽咽）和对话内容，多维度展现人物情感，避免了平淡的叙述。"
        }
    }
}

/// Generic explanation for kinds the caller names that we don't recognize.
const GENERIC_ANALYSIS: &str =
    "高阶写法通过多感官描写、细节刻画和修辞手法，让文字更有画面感和感染力。";

/// Level 3 by display name, for callers that hold the kind as text.
///
/// Unrecognized names get the generic explanation.
#[must_use]
pub fn analysis_by_name(name: &str) -> &'static str {
    let kind = match name {
        "环境描写" => ExampleKind::Environment,
        "情感表达" => ExampleKind::Emotion,
        "动作描写" => ExampleKind::Action,
        "心理描写" => ExampleKind::Psychology,
        "对话描写" => ExampleKind::Dialogue,
        _ => return GENERIC_ANALYSIS,
    };
    analysis(kind)
}

/// All three ladder steps at once, for callers that want the full run.
pub fn full_ladder(context: &str, theme: &str, rng: &mut impl Rng) -> LadderSteps {
    let guidance = guidance(context, rng);
    let example = examples(theme, rng);
    let analysis = analysis(example.kind).to_string();
    LadderSteps {
        guidance,
        example,
        analysis,
    }
}
