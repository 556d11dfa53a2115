//! 文档加载：单个文件 → 按源顺序排列的 Document 列表

mod pdf;
mod text;

use anyhow::Result;
use std::path::Path;

use rag_types::{Document, DocumentMetadata, RagError};

pub use pdf::load_pdf;
pub use text::load_text;

/// 按扩展名加载单个文件
///
/// 路径不存在或不可读时返回 `RagError::Load`；解析错误同样作为加载失败上报，不会被跳过。
pub fn load_file(path: &Path) -> Result<Vec<Document>> {
    if !path.is_file() {
        return Err(RagError::load(path.display().to_string(), "file not found").into());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let documents = match ext.as_str() {
        "pdf" => load_pdf(path)?,
        "txt" | "md" => load_text(path)?,
        other => {
            return Err(RagError::load(
                path.display().to_string(),
                format!("unsupported file type: '{}'", other),
            )
            .into())
        }
    };

    tracing::debug!("Loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

fn metadata_for(path: &Path, page_label: Option<String>) -> DocumentMetadata {
    DocumentMetadata {
        file_path: path.display().to_string(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        page_label,
        tool_name: None,
    }
}
