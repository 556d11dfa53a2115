use anyhow::Result;
use std::path::Path;

use rag_types::{Document, RagError};

use super::metadata_for;

/// PDF：每个非空页面一个 Document，page_label 从 1 开始
pub fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    let display = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| RagError::load(&display, e))?;

    // pdf-extract 遇到部分损坏文件会 panic
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .map_err(|_| RagError::load(&display, "PDF parser panicked on malformed input"))?
        .map_err(|e| RagError::load(&display, format!("PDF text extraction failed: {}", e)))?;

    let documents: Vec<Document> = non_blank_pages(&pages)
        .into_iter()
        .map(|(page, content)| Document::new(content, metadata_for(path, Some(page.to_string()))))
        .collect();

    if documents.is_empty() {
        return Err(RagError::load(&display, "PDF contains no extractable text").into());
    }

    Ok(documents)
}

/// 返回 (页码, 内容)，跳过空白页但保留原页码
fn non_blank_pages(pages: &[String]) -> Vec<(usize, &str)> {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| (i + 1, page.trim()))
        .filter(|(_, page)| !page.is_empty())
        .collect()
}
