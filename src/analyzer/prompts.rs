//! Prompt templates for paper assessment.

use crate::models::Language;

/// A system instruction plus a rendered user instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build the prompt pair for `language` with the paper interpolated.
///
/// The Chinese template asks for 5-10 coarse-to-fine tags, the English one
/// for 3-5; both ask for a strict integer score from a critical reviewer.
pub fn build_prompt(language: Language, title: &str, abstract_text: &str) -> Prompt {
    match language {
        Language::Cn => Prompt {
            system: "你是一名严谨的科研助手。请阅读论文的标题和摘要，只输出纯 JSON。"
                .to_string(),
            user: format!(
                r#"请分析下面这篇论文：
标题: {title}
摘要: {abstract_text}

只输出一个合法的 JSON 对象，包含以下字段：
1. "keywords": 字符串数组，5-10 个领域标签，按从粗到细排列。
2. "score": 整数，1-10 分，评价学术价值与创新性。请像严格的审稿人一样打分，避免分数虚高，让真正有价值的工作脱颖而出。
3. "summary": 字符串，用一句中文概括核心贡献，约 50 字。
4. "reason": 字符串，用中文简要说明打分理由，约 100 字。

JSON 示例:
{{
    "keywords": ["深度学习", "基因组学", "语言模型"],
    "score": 8,
    "summary": "提出一种基因组语言模型，在多项下游任务上超过现有方法。",
    "reason": "模型规模与训练数据量显著提升，实验覆盖面广，但生物学验证仍较有限。"
}}"#
            ),
        },
        Language::En => Prompt {
            system: "You are a rigorous research assistant. Read the paper title and abstract and reply with strict JSON only."
                .to_string(),
            user: format!(
                r#"Analyze the following paper:
Title: {title}
Abstract: {abstract_text}

Output ONLY one valid JSON object with these fields:
1. "keywords": list of strings, 3-5 domain tags.
2. "score": integer, 1-10, rating academic value and novelty. Score like a critical reviewer and avoid inflated scores.
3. "summary": string, a one-sentence summary in English.
4. "reason": string, a short justification for the score in English.

JSON example:
{{
    "keywords": ["Deep Learning", "NLP"],
    "score": 7,
    "summary": "Proposes a sparse attention mechanism for long documents.",
    "reason": "Clear gains on long-context benchmarks, but the ablations are thin."
}}"#
            ),
        },
    }
}
