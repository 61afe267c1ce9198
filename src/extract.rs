use crate::core::error::SitegenError;
use regex::Regex;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(\w*)\n([\s\S]*?)\n```").expect("fenced block pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

/// Pull the single fenced code block out of an assistant reply.
///
/// Zero blocks and several blocks are both rejected; the reply is expected to
/// hold one self-contained file and nothing is salvaged from a multi-file answer.
pub fn extract(text: &str) -> Result<CodeBlock, SitegenError> {
    let mut blocks = FENCED_BLOCK.captures_iter(text);

    let Some(caps) = blocks.next() else {
        tracing::debug!("reply holds no fenced code block");
        return Err(SitegenError::Format);
    };
    if blocks.next().is_some() {
        tracing::debug!("reply holds more than one fenced code block");
        return Err(SitegenError::Format);
    }

    Ok(CodeBlock {
        language: caps[1].to_string(),
        code: caps[2].to_string(),
    })
}
