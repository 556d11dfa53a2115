//! 测试替身：确定性的 embedding、脚本化的 chat、固定回答的查询引擎

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use model_provider::{ChatProvider, EmbedProvider};
use rag_types::{DocumentMetadata, NodeWithScore, Response, TextNode};

use crate::engine::QueryEngine;

pub fn node(text: &str) -> NodeWithScore {
    NodeWithScore::new(TextNode::new(text, DocumentMetadata::default()), Some(1.0))
}

/// 按 prompt 决定回复的 ChatProvider，记录调用
pub struct ScriptedChat {
    reply: Box<dyn Fn(&str) -> String + Send + Sync>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn chat(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok((self.reply)(prompt))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// 词袋哈希向量
pub struct HashEmbed {
    calls: AtomicUsize,
}

impl HashEmbed {
    pub const DIMENSION: usize = 32;

    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; Self::DIMENSION];
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            let bucket = word.bytes().map(|b| b as usize).sum::<usize>() % Self::DIMENSION;
            v[bucket] += 1.0;
        }
        // 全零向量的余弦相似度无意义
        v[0] += 0.01;
        v
    }
}

#[async_trait]
impl EmbedProvider for HashEmbed {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vector(text))
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn dimension(&self) -> Option<usize> {
        Some(Self::DIMENSION)
    }
}

/// 总是返回同一个 Response 的查询引擎
pub struct CannedEngine {
    response: Response,
    calls: AtomicUsize,
}

impl CannedEngine {
    pub fn new(text: &str) -> Self {
        Self {
            response: Response::new(text, vec![node(text)]),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryEngine for CannedEngine {
    async fn query(&self, _query: &str) -> Result<Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}
