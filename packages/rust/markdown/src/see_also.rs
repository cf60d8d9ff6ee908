//! "See also" list derived from the page's `relatedLinks` script metadata.

use crate::patterns::{RELATED_LINKS_RE, SEE_ALSO_HEADING, heading, top_level_scripts};

/// How related links become absolute output URLs.
#[derive(Debug, Clone, Copy)]
pub struct LinkRewrite<'a> {
    /// Leading prefix replaced by `base` (e.g. `/docs/`).
    pub prefix: &'a str,
    /// Absolute base ending with `/`.
    pub base: &'a str,
    /// Output extension appended to every link (no dot).
    pub format: &'a str,
}

/// Regenerate the "See also" section from `const relatedLinks = [...]`.
///
/// The first script block declaring the array wins. An existing
/// `## See also` section is replaced in place; otherwise the rendered section
/// is appended. Documents without the array are returned unchanged.
pub fn rewrite_see_also(md: &str, rewrite: &LinkRewrite<'_>) -> String {
    let Some(raw_links) = related_links(md) else {
        return md.to_string();
    };

    let links = parse_links(raw_links);
    let section = render_section(&links, rewrite);

    match find_section(md) {
        Some((start, end)) => format!("{}{section}{}", &md[..start], &md[end..]),
        None => format!("{md}\n\n{section}"),
    }
}

/// Bracketed contents of the first `relatedLinks` array inside a top-level
/// script block.
fn related_links(md: &str) -> Option<&str> {
    top_level_scripts(md).find_map(|script| {
        let body = script.get(1)?;
        RELATED_LINKS_RE
            .captures(body.as_str())
            .and_then(|caps| caps.get(1))
            .map(|m| &md[body.start() + m.start()..body.start() + m.end()])
    })
}

/// Split on commas, trim, drop one layer of quotes, drop empties.
fn parse_links(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(|token| strip_quotes(token.trim()))
        .filter(|token| !token.is_empty())
        .collect()
}

fn strip_quotes(token: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let token = token.strip_prefix(is_quote).unwrap_or(token);
    token.strip_suffix(is_quote).unwrap_or(token)
}

fn render_section(links: &[&str], rewrite: &LinkRewrite<'_>) -> String {
    let mut out = format!("{SEE_ALSO_HEADING}\n\n");
    for link in links {
        out.push_str(&format!("- [{}]({})\n", label(link), destination(link, rewrite)));
    }
    out.push('\n');
    out
}

/// `/docs/forms/number-input#props` → `Number input`.
fn label(link: &str) -> String {
    let last = link.rsplit('/').next().unwrap_or(link);
    let last = without_fragment(last);
    let mut chars = last.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars.collect();
            format!("{}{}", first.to_uppercase(), rest.replace('-', " "))
        }
        None => String::new(),
    }
}

/// `/docs/forms/number-input#props` → `<base>forms/number-input.<format>`.
fn destination(link: &str, rewrite: &LinkRewrite<'_>) -> String {
    let link = without_fragment(link);
    let link = match link.strip_prefix(rewrite.prefix) {
        Some(rest) if !rewrite.prefix.is_empty() => format!("{}{rest}", rewrite.base),
        _ => link.to_string(),
    };
    format!("{link}.{}", rewrite.format)
}

fn without_fragment(s: &str) -> &str {
    s.split('#').next().unwrap_or(s)
}

/// Byte range of an existing `## See also` section: from its heading line to
/// the next heading line, or to the end of the document.
fn find_section(md: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    let mut start = None;

    for line in md.split_inclusive('\n') {
        let text = line.trim_end_matches(['\n', '\r']);
        match start {
            None if text.trim_end() == SEE_ALSO_HEADING => start = Some(offset),
            Some(s) if heading(text).is_some() => return Some((s, offset)),
            _ => {}
        }
        offset += line.len();
    }

    start.map(|s| (s, md.len()))
}
