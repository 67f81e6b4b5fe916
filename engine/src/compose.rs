//! Staged instruction templates.
//!
//! Every template is a pure function of the stage and the session context:
//! identical inputs produce identical instruction text. Nothing here talks
//! to the collaborator; the engine dispatches whatever these return.

use scribe_types::{CognitiveStage, SessionContext, TranscriptMessage};

/// Fixed persona sent as the system prompt on every staged call.
pub const MENTOR_SYSTEM_PROMPT: &str =
    "你是一位经验丰富的中学语文写作导师，擅长用启发式、苏格拉底式和批判性思维方法指导学生写作。";

/// Compose the instruction for a stage from the session context.
///
/// Spark reads the topic and collected materials, Dig the most recently
/// collected material (empty when none), Refine the draft text.
#[must_use]
pub fn compose(stage: CognitiveStage, ctx: &SessionContext) -> String {
    match stage {
        CognitiveStage::Spark => spark_prompt(&ctx.topic, &ctx.materials),
        CognitiveStage::Dig => dig_prompt(ctx.latest_material().unwrap_or_default()),
        CognitiveStage::Refine => refine_prompt(&ctx.draft),
    }
}

/// Divergent-prompting instruction: surface 3-5 angles on the topic, with
/// material leads per angle, in an encouraging register.
#[must_use]
pub fn spark_prompt(topic: &str, materials: &[String]) -> String {
    let material_lines = materials
        .iter()
        .map(|m| format!("- {m}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "【启发式引导阶段】
你是一位中学语文写作专家，正在帮助学生构思记叙文。
题目：{topic}

已有素材：
{material_lines}

请执行以下任务：
1. 高亮题目中的关键词，分析其深层含义
2. 提供3-5个不同的写作角度或立意方向
3. 针对每个方向，提出1-2个可以挖掘的素材线索
4. 使用思维导图的方式展开联想

要求：
- 语言亲切自然，像导师一样引导
- 不要直接给答案，而是启发思考
- 使用生动的比喻和例子
- 控制在300字以内"
    )
}

/// Socratic follow-up instruction: exactly 5 questions over the material,
/// spread across the four question categories, in the fixed three-line
/// block format the parser understands.
#[must_use]
pub fn dig_prompt(material: &str) -> String {
    format!(
        "【苏格拉底式追问阶段】
学生提供了一个素材片段：
\"{material}\"

请生成5个苏格拉底式追问，帮助学生挖掘细节。追问应该覆盖：
1. 感官层面：视觉、听觉、嗅觉、触觉、味觉
2. 情感层面：当时的感受、情绪变化
3. 逻辑层面：因果关系、时间顺序
4. 视角层面：如果从他人角度看会怎样

每个追问格式：
- 类别：[sensory|emotional|logical|perspective]
- 问题：[具体问题]
- 提示：[可选的引导提示]

示例：
- 类别：sensory
- 问题：那一刻你听到了什么声音？这个声音给你什么感觉？
- 提示：试着回忆环境中的细微声响"
    )
}

/// Critical-revision instruction: a praise → diagnose → encourage critique
/// of the full draft.
#[must_use]
pub fn refine_prompt(draft: &str) -> String {
    format!(
        "【批判性思维挑刺阶段】
请对以下作文草稿进行\"汉堡包评价法\"点评：

草稿内容：
{draft}

点评要求：
1. 先夸（第一层面包）：找出2-3个亮点，具体说明好在哪里
2. 再批（中间肉饼）：
   - 逻辑漏洞：时间、因果关系是否合理
   - 用词问题：是否有敏感词、不当表达
   - 角色一致性：人物行为是否符合设定
   - 细节缺失：哪些地方可以更具体
3. 最后鼓励（第二层面包）：给出改进方向和信心

注意：
- 语气要温和，保护学生自尊心
- 具体指出问题所在，不要空泛
- 给出可操作的修改建议
- 控制在400字以内"
    )
}

/// Session-compression instruction: squeeze the transcript into a short
/// summary that keeps the learner's ideas, finished steps, and open points.
#[must_use]
pub fn summarize_prompt(transcript: &[TranscriptMessage]) -> String {
    let rendered = transcript
        .iter()
        .map(|m| format!("[{}]: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "请将以下对话压缩成200字以内的摘要，保留关键信息：

{rendered}

摘要要求：
- 包含学生的核心想法和素材
- 记录已完成的步骤
- 标注待解决的问题
- 语言简洁明了"
    )
}
