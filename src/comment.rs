//! Documentation-comment decoding.
//!
//! Finds `/** ... */` blocks in source text and splits each block into titled tags. A tag
//! starts on a line whose first non-blank character is `@`; its description runs until the
//! next tag or the end of the block.

use regex::Regex;
use std::sync::LazyLock;

static DOC_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*\*([\s\S]*?)\*/").expect("doc block pattern is valid"));

/// One decoded `/** ... */` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationBlock {
    /// 1-based line of the opening `/**`
    pub line: usize,
    /// Free text before the first tag
    pub description: String,
    /// Tags in source order
    pub tags: Vec<AnnotationTag>,
}

/// A single `@title description` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTag {
    pub title: String,
    pub description: String,
}

/// Scans source text and decodes every doc-comment block, in order of appearance.
///
/// Text without any `/**` block yields an empty vector.
pub fn find_blocks(source: &str) -> Vec<AnnotationBlock> {
    let mut line = 1;
    let mut scanned = 0;

    DOC_BLOCK
        .find_iter(source)
        .map(|m| {
            line += source[scanned..m.start()].matches('\n').count();
            scanned = m.start();

            let mut block = parse_block(m.as_str());
            block.line = line;
            block
        })
        .collect()
}

/// Decodes a single raw block, delimiters included.
pub fn parse_block(raw: &str) -> AnnotationBlock {
    let body = unwrap_comment(raw);

    let mut description: Vec<&str> = Vec::new();
    let mut tags = Vec::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in body.lines() {
        if let Some((title, remainder)) = split_tag_line(line) {
            if let Some((title, lines)) = current.take() {
                tags.push(AnnotationTag {
                    title: title.to_string(),
                    description: normalize_text(&lines),
                });
            }
            let mut lines = Vec::new();
            if !remainder.trim().is_empty() {
                lines.push(remainder.trim());
            }
            current = Some((title, lines));
            continue;
        }

        match current.as_mut() {
            Some((_, lines)) => lines.push(line),
            None => description.push(line),
        }
    }

    if let Some((title, lines)) = current {
        tags.push(AnnotationTag {
            title: title.to_string(),
            description: normalize_text(&lines),
        });
    }

    AnnotationBlock {
        line: 0,
        description: normalize_text(&description),
        tags,
    }
}

/// Strips the comment delimiters and the leading ` * ` decoration of every line.
fn unwrap_comment(raw: &str) -> String {
    let inner = raw.strip_prefix("/**").unwrap_or(raw);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);

    inner
        .lines()
        .map(|line| match line.trim_start().strip_prefix('*') {
            Some(rest) => rest
                .strip_prefix(' ')
                .or_else(|| rest.strip_prefix('\t'))
                .unwrap_or(rest),
            // Undecorated lines keep their indentation; dedent happens per description
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns `(title, remainder)` when the line opens a new tag.
fn split_tag_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix('@')?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '-')))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some(rest.split_at(end))
}

/// Removes the common indentation, leading blank lines and trailing whitespace.
fn normalize_text(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let dedented: Vec<&str> = lines
        .iter()
        .map(|l| if l.trim().is_empty() { "" } else { &l[indent..] })
        .skip_while(|l| l.is_empty())
        .collect();

    dedented.join("\n").trim_end().to_string()
}
