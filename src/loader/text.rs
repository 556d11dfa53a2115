use anyhow::Result;
use std::path::Path;

use rag_types::{Document, RagError};

use super::metadata_for;

/// 纯文本 / Markdown：整个文件作为一个 Document
pub fn load_text(path: &Path) -> Result<Vec<Document>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| RagError::load(path.display().to_string(), e))?;

    if text.trim().is_empty() {
        return Err(RagError::load(path.display().to_string(), "file contains no text").into());
    }

    Ok(vec![Document::new(text, metadata_for(path, None))])
}
