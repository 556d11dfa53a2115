use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 文档来源信息，拆分出的节点会继承这份元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub file_path: String,
    pub file_name: String,
    /// PDF 页码（从 1 开始），纯文本文件为 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_label: Option<String>,
    /// 产生该内容的工具名（子问题回答节点使用）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

/// 从单个源文件提取出的一段文本（通常一页一个）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            metadata,
        }
    }
}

/// 文档切分后的文本块，是索引与检索的最小单位
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextNode {
    pub id: String,
    pub text: String,
    /// 所属 Document 的 id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_doc_id: Option<String>,
    pub metadata: DocumentMetadata,
}

impl TextNode {
    pub fn new(text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            ref_doc_id: None,
            metadata,
        }
    }

    /// 从文档切出的节点，继承文档元数据
    pub fn from_document(document: &Document, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            ref_doc_id: Some(document.id.clone()),
            metadata: document.metadata.clone(),
        }
    }
}

/// 检索结果：节点 + 相似度
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeWithScore {
    pub node: TextNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl NodeWithScore {
    pub fn new(node: TextNode, score: Option<f32>) -> Self {
        Self { node, score }
    }

    pub fn text(&self) -> &str {
        &self.node.text
    }
}

/// 工具描述，规划器根据描述决定把子问题交给谁
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
}

impl ToolMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// 规划器生成的单个子问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub sub_question: String,
    pub tool_name: String,
}

/// 子问题与对应工具的回答
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubQuestionAnswer {
    pub question: SubQuestion,
    pub response: Response,
}

/// 查询响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    pub source_nodes: Vec<NodeWithScore>,
    /// 仅子问题引擎填充；单索引查询为空
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_answers: Vec<SubQuestionAnswer>,
}

impl Response {
    pub fn new(text: impl Into<String>, source_nodes: Vec<NodeWithScore>) -> Self {
        Self {
            text: text.into(),
            source_nodes,
            sub_answers: Vec::new(),
        }
    }

    pub fn with_sub_answers(mut self, sub_answers: Vec<SubQuestionAnswer>) -> Self {
        self.sub_answers = sub_answers;
        self
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for Response {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.sub_answers.len() == other.sub_answers.len()
            && self
                .source_nodes
                .iter()
                .map(NodeWithScore::text)
                .eq(other.source_nodes.iter().map(NodeWithScore::text))
            && self
                .sub_answers
                .iter()
                .zip(&other.sub_answers)
                .all(|(a, b)| a.question == b.question && a.response == b.response)
    }
}
