use anyhow::{Context, Result};

/// 转义放进 prompt 的用户文本和工具描述
pub fn escape_xml(input: &str) -> String {
    quick_xml::escape::escape(input).into_owned()
}

/// 从 LLM 输出中提取 <queries>...</queries> 块
pub fn extract_queries_xml(output: &str) -> Result<String> {
    let start = output
        .find("<queries>")
        .context("LLM output missing <queries> tag")?;
    let end = output[start..]
        .find("</queries>")
        .context("LLM output missing </queries> tag")?;
    let end = start + end + "</queries>".len();
    Ok(output[start..end].to_string())
}

const MIN_QUERY_LEN: usize = 5;
const MAX_QUERY_LEN: usize = 500;

/// 验证子问题内容长度（按字符计）
pub fn is_valid_query(query: &str) -> bool {
    let len = query.trim().chars().count();
    (MIN_QUERY_LEN..=MAX_QUERY_LEN).contains(&len)
}
