use anyhow::{Context, Result};
use async_trait::async_trait;

use rag_types::{
    DocumentMetadata, NodeWithScore, RagError, Response, SubQuestion, SubQuestionAnswer, TextNode,
};

use super::QueryEngine;
use crate::llm::{QuestionGenerator, ResponseSynthesizer};
use crate::tools::ToolRegistry;

/// 子问题编排：规划 → 逐个执行 → 综合
pub struct SubQuestionQueryEngine {
    registry: ToolRegistry,
    generator: Box<dyn QuestionGenerator>,
    synthesizer: ResponseSynthesizer,
    max_sub_questions: usize,
}

impl SubQuestionQueryEngine {
    pub fn new(
        registry: ToolRegistry,
        generator: Box<dyn QuestionGenerator>,
        synthesizer: ResponseSynthesizer,
        max_sub_questions: usize,
    ) -> Self {
        Self {
            registry,
            generator,
            synthesizer,
            max_sub_questions: max_sub_questions.max(1),
        }
    }

    async fn plan(&self, query: &str) -> Result<Vec<SubQuestion>> {
        let mut plan = self
            .generator
            .generate(&self.registry.metadata(), query)
            .await
            .context("Failed to generate sub-questions")?;

        if plan.len() > self.max_sub_questions {
            tracing::warn!(
                "Planner produced {} sub-questions, keeping the first {}",
                plan.len(),
                self.max_sub_questions
            );
            plan.truncate(self.max_sub_questions);
        }
        Ok(plan)
    }

    async fn answer(&self, sub_question: SubQuestion) -> Result<SubQuestionAnswer> {
        let tool = self.registry.get(&sub_question.tool_name).ok_or_else(|| {
            RagError::Plan(format!(
                "sub-question targets unknown tool '{}'",
                sub_question.tool_name
            ))
        })?;

        tracing::info!("[{}] Q: {}", sub_question.tool_name, sub_question.sub_question);
        let response = tool
            .engine
            .query(&sub_question.sub_question)
            .await
            .with_context(|| format!("Tool '{}' failed", sub_question.tool_name))?;
        tracing::info!("[{}] A: {}", sub_question.tool_name, response.text);

        Ok(SubQuestionAnswer {
            question: sub_question,
            response,
        })
    }
}

#[async_trait]
impl QueryEngine for SubQuestionQueryEngine {
    async fn query(&self, query: &str) -> Result<Response> {
        let plan = self.plan(query).await?;
        tracing::info!("Generated {} sub questions", plan.len());

        let mut answers = Vec::with_capacity(plan.len());
        for sub_question in plan {
            answers.push(self.answer(sub_question).await?);
        }

        // 只问了一个工具时直接采用它的回答
        if let [only] = answers.as_slice() {
            let response = only.response.clone();
            return Ok(response.with_sub_answers(answers));
        }

        let nodes = answers.iter().map(answer_node).collect();
        let response = self.synthesizer.synthesize(query, nodes).await?;
        Ok(response.with_sub_answers(answers))
    }
}

fn answer_node(answer: &SubQuestionAnswer) -> NodeWithScore {
    let text = format!(
        "Sub question: {}\nResponse: {}",
        answer.question.sub_question, answer.response.text
    );
    let metadata = DocumentMetadata {
        tool_name: Some(answer.question.tool_name.clone()),
        ..DocumentMetadata::default()
    };
    NodeWithScore::new(TextNode::new(text, metadata), None)
}
