//! Named recognizers for the sub-structures the passes rewrite.
//!
//! Documents follow house conventions rather than arbitrary Markdown, so each
//! structure is recognized by one regular expression kept here, where the
//! passes that depend on it can be audited together.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// An ATX heading line: `(#+) <title>`.
pub(crate) static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#+)\s+(.+)$").expect("heading regex"));

/// A `svelte` fence opener with optional trailing decorator tokens.
pub(crate) static SVELTE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^```svelte(?:[ \t].*)?$").expect("svelte fence regex"));

/// `{#include <path>}` where the path contains no whitespace or `}`.
pub(crate) static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{#include\s+([^\s}]+)\}").expect("include regex"));

/// A complete `<script ...> ... </script>` block, including trailing whitespace.
pub(crate) static SCRIPT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>(.*?)</script>\s*").expect("script block regex")
});

/// `const relatedLinks = [ ... ]` inside a script body.
pub(crate) static RELATED_LINKS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)const\s+relatedLinks\s*=\s*\[(.*?)\]").expect("related links regex")
});

/// Heading that opens the structured component data section.
pub(crate) const COMPONENT_DATA_HEADING: &str = "## Component data";

/// The component data heading alone on its line.
pub(crate) static COMPONENT_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^## Component data[ \t]*\r?\n").expect("component data regex")
});

/// Heading that opens the derived link list.
pub(crate) const SEE_ALSO_HEADING: &str = "## See also";

/// Parse a heading line into `(depth, title)`.
pub(crate) fn heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_end_matches('\r');
    let caps = HEADING_RE.captures(line)?;
    let depth = caps.get(1)?.as_str().len();
    let title = caps.get(2)?.as_str();
    Some((depth, title))
}

/// Byte ranges of fenced code blocks, opener through closing fence. An
/// unclosed fence runs to the end of the document.
pub(crate) fn fenced_ranges(md: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open = None;
    let mut offset = 0;

    for line in md.split_inclusive('\n') {
        if line.trim_start().starts_with("```") {
            match open.take() {
                Some(start) => ranges.push(start..offset + line.len()),
                None => open = Some(offset),
            }
        }
        offset += line.len();
    }

    if let Some(start) = open {
        ranges.push(start..md.len());
    }
    ranges
}

/// Script blocks that start outside fenced code, in document order.
///
/// Included examples carry their own `<script>` inside a fence; those belong
/// to the example and are never page metadata.
pub(crate) fn top_level_scripts(md: &str) -> impl Iterator<Item = Captures<'_>> {
    let fenced = fenced_ranges(md);
    SCRIPT_BLOCK_RE.captures_iter(md).filter(move |caps| {
        let start = caps.get(0).map_or(0, |m| m.start());
        !fenced.iter().any(|range| range.contains(&start))
    })
}
