//! 工具：名字 + 描述 + 查询引擎

use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;

use rag_types::{RagError, ToolMetadata};

use crate::engine::QueryEngine;

/// 把一个查询引擎包装成规划器可选择的工具
#[derive(Clone)]
pub struct QueryEngineTool {
    pub metadata: ToolMetadata,
    pub engine: Arc<dyn QueryEngine>,
}

impl QueryEngineTool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        engine: Arc<dyn QueryEngine>,
    ) -> Self {
        Self {
            metadata: ToolMetadata::new(name, description),
            engine,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

/// 按配置顺序排列的工具集合，构建后不可变
pub struct ToolRegistry {
    tools: Vec<QueryEngineTool>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<QueryEngineTool>) -> Result<Self> {
        if tools.is_empty() {
            return Err(RagError::InvalidConfig("tool registry cannot be empty".to_string()).into());
        }

        let mut seen = HashSet::new();
        for tool in &tools {
            if !seen.insert(tool.name()) {
                return Err(RagError::InvalidConfig(format!(
                    "duplicate tool name '{}'",
                    tool.name()
                ))
                .into());
            }
        }

        Ok(Self { tools })
    }

    pub fn get(&self, name: &str) -> Option<&QueryEngineTool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn metadata(&self) -> Vec<ToolMetadata> {
        self.tools.iter().map(|t| t.metadata.clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
