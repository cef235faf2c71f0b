//! In-place splicing of generated regions into target files.
//!
//! Two strategies, resolved once per target before any mutation is computed:
//!
//! - [`WriteStrategy::MarkerBlock`]: a start/end marker comment pair owns the
//!   region; the block between them is replaced, the marker lines stay.
//! - [`WriteStrategy::StructuralSplice`]: no usable markers; the byte span of
//!   a located key's value is replaced instead.
//!
//! Either way only the delimited sub-region changes; surrounding template
//! syntax and formatting stay byte-identical.

use crate::errors::ScanError;
use crate::scan::{KeyValue, Span};

pub const START_MARKER: &str = "{{/* PERMISSIONS:START */}}";
pub const END_MARKER: &str = "{{/* PERMISSIONS:END */}}";

/// A usable marker pair: the span strictly between the markers and the
/// indentation captured from the start marker's line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerBlock {
    pub replace: Span,
    pub indent: String,
}

/// How a target file gets mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStrategy {
    MarkerBlock(MarkerBlock),
    StructuralSplice(KeyValue),
}

/// Resolve the strategy for one target: marker block when a usable pair
/// exists, otherwise whatever `locate` finds.
///
/// Markers absent or out of order fall through to `locate`; a start marker
/// sharing its line with other content is an error.
pub fn resolve_strategy(
    contents: &str,
    locate: impl FnOnce(&str) -> Result<KeyValue, ScanError>,
) -> Result<WriteStrategy, ScanError> {
    if let Some(block) = find_marker_block(contents)? {
        return Ok(WriteStrategy::MarkerBlock(block));
    }
    locate(contents).map(WriteStrategy::StructuralSplice)
}

/// Find a usable marker pair. `Ok(None)` means the marker strategy is
/// inapplicable (a marker missing, or end before start).
pub fn find_marker_block(contents: &str) -> Result<Option<MarkerBlock>, ScanError> {
    let (Some(start), Some(end)) = (contents.find(START_MARKER), contents.find(END_MARKER)) else {
        return Ok(None);
    };
    if end < start {
        return Ok(None);
    }
    let indent = line_indent(contents, start)?;
    Ok(Some(MarkerBlock {
        replace: Span::new(start + START_MARKER.len(), end),
        indent,
    }))
}

/// Replace the block between the markers with `lines`, each prefixed by the
/// captured indent. The end marker keeps the same indent; anything after it
/// on its line is preserved.
pub fn splice_marker_block(contents: &str, block: &MarkerBlock, lines: &[String]) -> String {
    let mut body = String::from("\n");
    for line in lines {
        body.push_str(&block.indent);
        body.push_str(line);
        body.push('\n');
    }
    body.push_str(&block.indent);
    format!(
        "{}{}{}",
        &contents[..block.replace.start],
        body,
        &contents[block.replace.end..]
    )
}

/// Replace a located value span with `rendered`, re-indenting its
/// continuation lines to the key's line indent.
pub fn splice_value(contents: &str, found: &KeyValue, rendered: &str) -> String {
    let indent = line_indent_for_pos(contents, found.key_pos);
    let mut replacement = String::new();
    for (i, line) in rendered.split('\n').enumerate() {
        if i > 0 {
            replacement.push('\n');
            replacement.push_str(&indent);
        }
        replacement.push_str(line);
    }
    format!(
        "{}{}{}",
        &contents[..found.value.start],
        replacement,
        &contents[found.value.end..]
    )
}

/// Leading whitespace of the line holding `pos`; errors if anything else
/// precedes `pos` on that line.
fn line_indent(contents: &str, pos: usize) -> Result<String, ScanError> {
    let indent = line_indent_for_pos(contents, pos);
    if !indent.trim().is_empty() {
        return Err(ScanError::MarkerNotAlone(indent));
    }
    Ok(indent)
}

fn line_indent_for_pos(contents: &str, pos: usize) -> String {
    let line_start = contents[..pos].rfind('\n').map_or(0, |i| i + 1);
    contents[line_start..pos].to_string()
}
