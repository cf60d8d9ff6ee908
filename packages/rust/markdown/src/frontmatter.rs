//! Front-matter extraction and parsing.

use std::collections::BTreeMap;

use serde::Deserialize;

use docllm_shared::{DocLlmError, Result};

/// Parsed front-matter of a documentation page.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FrontMatter {
    /// Page title, injected as the output's H1.
    #[serde(default)]
    pub title: Option<String>,

    /// Component whose sidecar data fills the "Component data" section.
    #[serde(default, alias = "componentTitle")]
    pub component_title: Option<String>,

    /// Any other keys, kept for completeness.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Split `source` into its front-matter and body.
///
/// A document without a leading `---` block has default front-matter and the
/// whole input as body. Exactly one line break after the closing `---` is
/// consumed; everything after it is the body verbatim.
pub fn split_front_matter(source: &str) -> Result<(FrontMatter, &str)> {
    let Some(after_open) = source
        .strip_prefix("---\r\n")
        .or_else(|| source.strip_prefix("---\n"))
    else {
        return Ok((FrontMatter::default(), source));
    };

    let (yaml, rest) = match find_closing_fence(after_open) {
        Some((yaml_end, rest_start)) => (&after_open[..yaml_end], &after_open[rest_start..]),
        None => return Err(DocLlmError::parse("unclosed front-matter block, missing closing ---")),
    };

    let body = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let front_matter = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| DocLlmError::parse(format!("invalid YAML in front-matter: {e}")))?
    };

    Ok((front_matter, body))
}

/// Locate a line consisting of `---`. Returns the end of the YAML text and the
/// index just past the fence.
fn find_closing_fence(text: &str) -> Option<(usize, usize)> {
    if text.starts_with("---") && is_fence_end(&text[3..]) {
        return Some((0, 3));
    }
    let mut search_from = 0;
    while let Some(pos) = text[search_from..].find("\n---") {
        let fence_start = search_from + pos + 1;
        let after = fence_start + 3;
        if is_fence_end(&text[after..]) {
            return Some((fence_start, after));
        }
        search_from = after;
    }
    None
}

fn is_fence_end(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n")
}

/// Treat empty strings as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
