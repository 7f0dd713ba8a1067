//! Signal extraction over raw generated text.
//!
//! Three independent pattern passes, none of which parses the text as code:
//! directory mentions (`mkdir NAME`), fenced code blocks, and filename
//! mentions with a whitelisted extension. Each pass is pure and tolerates
//! arbitrary input; finding nothing is the normal case.

use regex::Regex;
use std::sync::OnceLock;

use crate::data::{CodeBlock, DirectoryToken, FenceLanguage, FilenameToken, TokenSet};

/// Extensions a filename mention must end with.
pub const FILENAME_EXTENSIONS: &[&str] = &[
    "json", "js", "py", "txt", "html", "css", "yaml", "yml", "md", "sh",
];

fn mkdir_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`?mkdir\s+([a-zA-Z0-9_\-\.]+)`?").expect("valid regex"))
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```([^\n`]*)\n(.*?)```").expect("valid regex"))
}

fn filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"[a-zA-Z0-9_\-]+\.(?:{})\b",
            FILENAME_EXTENSIONS.join("|")
        );
        Regex::new(&pattern).expect("valid regex")
    })
}

/// Directory names from `mkdir`-style mentions, deduplicated.
///
/// Matching is case-sensitive. Single-character and dot-only names are
/// dropped as noise.
pub fn extract_directories(text: &str) -> TokenSet<DirectoryToken> {
    mkdir_re()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| DirectoryToken::new(m.as_str()))
        .collect()
}

/// Fenced code blocks in appearance order, duplicates kept.
///
/// The opening fence may carry any tag (or none); recognised tags are
/// reported on the block. Content is captured verbatim.
pub fn extract_code_blocks(text: &str) -> Vec<CodeBlock> {
    fence_re()
        .captures_iter(text)
        .enumerate()
        .map(|(index, caps)| {
            let tag = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            let content = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            CodeBlock {
                index,
                content: content.to_string(),
                language: tag
                    .split_whitespace()
                    .next()
                    .and_then(FenceLanguage::from_tag),
            }
        })
        .collect()
}

/// Filename mentions, deduplicated. Iteration order is unspecified.
pub fn extract_filenames(text: &str) -> TokenSet<FilenameToken> {
    filename_re()
        .find_iter(text)
        .filter_map(|m| FilenameToken::new(m.as_str()))
        .collect()
}

/// All three signal collections for one piece of generated text.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    pub directories: TokenSet<DirectoryToken>,
    pub code_blocks: Vec<CodeBlock>,
    pub filenames: TokenSet<FilenameToken>,
}

impl Signals {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.code_blocks.is_empty()
    }
}

/// Runs every extractor over `text`.
pub fn extract_signals(text: &str) -> Signals {
    Signals {
        directories: extract_directories(text),
        code_blocks: extract_code_blocks(text),
        filenames: extract_filenames(text),
    }
}
