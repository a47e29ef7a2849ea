// crates/extract_code_blocks/src/lib.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening fence, optional language tag, rest of the info line (discarded),
/// newline, then the shortest run of text up to the next closing fence.
static FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```([\w+#.-]*)[^\n`]*\n(.*?)```").expect("fence regex is valid")
});

/// A fenced region lifted out of a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// The token that followed the opening fence, if any. Kept for logging;
    /// analysis never looks at it.
    pub language: Option<String>,
    /// Verbatim text between the fences.
    pub content: String,
}

/// Returns every complete fenced block in `text`, in the order the fences
/// appear. An opening fence with no closing partner yields nothing.
pub fn extract_code_blocks(text: &str) -> Vec<CodeBlock> {
    let blocks: Vec<CodeBlock> = FENCE_RE
        .captures_iter(text)
        .map(|caps| {
            let language = caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|tag| !tag.is_empty())
                .map(str::to_string);
            let content = caps.get(2).map_or("", |m| m.as_str()).to_string();
            CodeBlock { language, content }
        })
        .collect();

    log::debug!("extracted {} code block(s)", blocks.len());
    for (idx, block) in blocks.iter().enumerate() {
        log::debug!(
            "  block {}: language={} lines={}",
            idx + 1,
            block.language.as_deref().unwrap_or("<none>"),
            block.content.lines().count()
        );
    }
    blocks
}

/// Convenience wrapper for callers that only need the raw text.
pub fn extract_code_strings(text: &str) -> Vec<String> {
    extract_code_blocks(text)
        .into_iter()
        .map(|block| block.content)
        .collect()
}
