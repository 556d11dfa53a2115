use anyhow::Result;
use std::sync::Arc;

use model_provider::ChatProvider;
use rag_types::{NodeWithScore, Response};

use super::utils::escape_xml;

/// 没有任何上下文时的固定回答（不调用 LLM）
pub const EMPTY_RESPONSE: &str = "Empty Response";

const QA_FRAMEWORK: &str = r#"Context information is below.

<context>
{context}
</context>

Using only the context information and not prior knowledge, answer the question. Answer in the language of the question.

Question:
<user_query>
{query}
</user_query>

Answer:"#;

const REFINE_FRAMEWORK: &str = r#"The original question is:
<user_query>
{query}
</user_query>

We have provided an existing answer:
<existing_answer>
{existing_answer}
</existing_answer>

We have the opportunity to refine the existing answer (only if needed) with some more context below.

<context>
{context}
</context>

Given the new context, refine the original answer to better answer the question. If the context isn't useful, return the original answer unchanged.

Refined answer:"#;

/// 基于检索片段生成回答（compact + refine）
///
/// 片段先按 `max_context_chars` 打包成块，第一块直接作答，其余块逐个 refine。
pub struct ResponseSynthesizer {
    chat: Arc<dyn ChatProvider>,
    max_context_chars: usize,
}

impl ResponseSynthesizer {
    pub fn new(chat: Arc<dyn ChatProvider>, max_context_chars: usize) -> Self {
        Self {
            chat,
            max_context_chars: max_context_chars.max(1),
        }
    }

    pub async fn synthesize(&self, query: &str, nodes: Vec<NodeWithScore>) -> Result<Response> {
        if nodes.is_empty() {
            return Ok(Response::new(EMPTY_RESPONSE, nodes));
        }

        let blocks = pack_context(&nodes, self.max_context_chars);
        tracing::debug!(
            "Synthesizing from {} nodes in {} context blocks",
            nodes.len(),
            blocks.len()
        );

        let query = escape_xml(query);
        let mut answer: Option<String> = None;
        for block in &blocks {
            let prompt = match &answer {
                None => QA_FRAMEWORK
                    .replace("{context}", block)
                    .replace("{query}", &query),
                Some(existing) => REFINE_FRAMEWORK
                    .replace("{context}", block)
                    .replace("{existing_answer}", existing)
                    .replace("{query}", &query),
            };
            answer = Some(self.chat.chat(&prompt).await?.trim().to_string());
        }

        Ok(Response::new(answer.unwrap_or_default(), nodes))
    }
}

/// 按顺序把片段文本打包成不超过 `max_chars` 的块；单个超长片段独占一块
fn pack_context(nodes: &[NodeWithScore], max_chars: usize) -> Vec<String> {
    const SEPARATOR: &str = "\n\n";

    let mut blocks = Vec::new();
    let mut current = String::new();
    for node in nodes {
        let text = node.text().trim();
        if text.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            text.chars().count()
        } else {
            current.chars().count() + SEPARATOR.len() + text.chars().count()
        };
        if !current.is_empty() && needed > max_chars {
            blocks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str(SEPARATOR);
        }
        current.push_str(text);
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{node, ScriptedChat};

    #[test]
    fn test_pack_context_respects_limit() {
        let nodes = vec![node("aaaa"), node("bbbb"), node("cccc")];

        let blocks = pack_context(&nodes, 10);

        assert_eq!(blocks, vec!["aaaa\n\nbbbb".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn test_pack_context_keeps_oversized_node_whole() {
        let nodes = vec![node("corto"), node(&"x".repeat(50))];

        let blocks = pack_context(&nodes, 10);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].len(), 50);
    }

    #[tokio::test]
    async fn test_empty_nodes_skip_llm() {
        let chat = Arc::new(ScriptedChat::new(|_| "no deberia llamarse".to_string()));
        let synthesizer = ResponseSynthesizer::new(chat.clone(), 1000);

        let response = synthesizer.synthesize("¿algo?", Vec::new()).await.unwrap();

        assert_eq!(response.text, EMPTY_RESPONSE);
        assert_eq!(chat.calls(), 0);
    }

    #[tokio::test]
    async fn test_single_block_uses_qa_prompt() {
        let chat = Arc::new(ScriptedChat::new(|_| "  Respuesta final.  ".to_string()));
        let synthesizer = ResponseSynthesizer::new(chat.clone(), 1000);

        let response = synthesizer
            .synthesize("¿Qué propone?", vec![node("Bajar el IVA.")])
            .await
            .unwrap();

        assert_eq!(response.text, "Respuesta final.");
        assert_eq!(response.source_nodes.len(), 1);
        let prompts = chat.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Bajar el IVA."));
        assert!(prompts[0].contains("¿Qué propone?"));
        assert!(!prompts[0].contains("existing_answer"));
    }

    #[tokio::test]
    async fn test_multiple_blocks_refine_previous_answer() {
        let chat = Arc::new(ScriptedChat::new(|prompt| {
            if prompt.contains("<existing_answer>") {
                "refinada".to_string()
            } else {
                "inicial".to_string()
            }
        }));
        let synthesizer = ResponseSynthesizer::new(chat.clone(), 8);

        let response = synthesizer
            .synthesize("¿Qué?", vec![node("primero"), node("segundo")])
            .await
            .unwrap();

        assert_eq!(response.text, "refinada");
        let prompts = chat.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("inicial"));
        assert!(prompts[1].contains("segundo"));
    }
}
