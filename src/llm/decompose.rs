use anyhow::Result;
use async_trait::async_trait;
use quick_xml::de::from_str as xml_from_str;
use serde::Deserialize;
use std::sync::Arc;

use model_provider::ChatProvider;
use rag_types::{RagError, SubQuestion, ToolMetadata};

use super::utils::{escape_xml, extract_queries_xml, is_valid_query};

const DECOMPOSE_FRAMEWORK: &str = r#"You are a research planner. Your task is to break the user's question into sub-questions that can each be answered by exactly one of the tools below.

Available tools:
<tools>
{tools}
</tools>

Rules:
- Only use tool names listed above.
- Ask a tool only about the document it describes.
- If the question concerns several documents, ask each relevant tool separately.
- Write every sub-question as a complete question in the language of the user's question.

User question:
<user_query>
{query}
</user_query>

Output the sub-questions in the following XML format, starting at <queries> and ending at </queries>, with nothing else:

<queries>
  <query>
    <tool>tool name</tool>
    <question>sub-question</question>
  </query>
</queries>"#;

/// 子问题规划器
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// 根据工具描述把问题拆成子问题，每个子问题指向一个工具
    async fn generate(&self, tools: &[ToolMetadata], query: &str) -> Result<Vec<SubQuestion>>;
}

/// LLM 输出的 XML 结构（用于 serde 反序列化）
#[derive(Debug, Deserialize)]
struct QueriesXml {
    #[serde(default)]
    query: Vec<SubQueryXml>,
}

#[derive(Debug, Deserialize)]
struct SubQueryXml {
    #[serde(default)]
    tool: String,
    #[serde(default)]
    question: String,
}

/// 基于 LLM 的子问题规划
pub struct LlmQuestionGenerator {
    chat: Arc<dyn ChatProvider>,
}

impl LlmQuestionGenerator {
    pub fn new(chat: Arc<dyn ChatProvider>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate(&self, tools: &[ToolMetadata], query: &str) -> Result<Vec<SubQuestion>> {
        let prompt = build_prompt(tools, query);
        tracing::debug!("Decompose prompt: {}", prompt);

        let output = self.chat.chat(&prompt).await?;
        tracing::debug!("LLM decompose output: {}", output);

        parse_sub_questions(&output, tools)
    }
}

fn build_prompt(tools: &[ToolMetadata], query: &str) -> String {
    let tools_text = tools
        .iter()
        .map(|t| {
            format!(
                "  <tool>\n    <name>{}</name>\n    <description>{}</description>\n  </tool>",
                escape_xml(&t.name),
                escape_xml(&t.description)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    DECOMPOSE_FRAMEWORK
        .replace("{tools}", &tools_text)
        .replace("{query}", &escape_xml(query))
}

/// 解析 LLM 输出；工具名不存在或没有有效子问题都视为规划失败
fn parse_sub_questions(output: &str, tools: &[ToolMetadata]) -> Result<Vec<SubQuestion>> {
    let xml = extract_queries_xml(output).map_err(|e| RagError::Plan(e.to_string()))?;
    let parsed: QueriesXml = xml_from_str(&xml)
        .map_err(|e| RagError::Plan(format!("Failed to parse LLM XML output: {}", e)))?;

    let mut sub_questions = Vec::with_capacity(parsed.query.len());
    for sq in parsed.query {
        let question = sq.question.trim();
        if !is_valid_query(question) {
            tracing::warn!(
                "Skipping invalid sub-question: question_len={}",
                question.chars().count()
            );
            continue;
        }

        let tool_name = sq.tool.trim();
        if !tools.iter().any(|t| t.name == tool_name) {
            return Err(RagError::Plan(format!(
                "sub-question targets unknown tool '{}'",
                tool_name
            ))
            .into());
        }

        sub_questions.push(SubQuestion {
            sub_question: question.to_string(),
            tool_name: tool_name.to_string(),
        });
    }

    if sub_questions.is_empty() {
        return Err(
            RagError::Plan("No valid sub-questions parsed from LLM output".to_string()).into(),
        );
    }

    Ok(sub_questions)
}
