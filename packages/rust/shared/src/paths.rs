//! Pure path helpers shared by the pipeline, the cleaner and the aggregator.
//!
//! Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Remove the configured strip-prefix segment from an output-relative path.
///
/// The prefix is matched literally (never as a pattern). A leading
/// `<prefix>/` or `<prefix>\` is removed first; otherwise the first path
/// segment equal to the prefix is dropped and the remaining segments are
/// joined with `/`. Paths that do not contain the prefix come back unchanged.
pub fn rewrite_path(relative_path: &str, strip_prefix: Option<&str>) -> String {
    let Some(prefix) = strip_prefix.filter(|p| !p.trim().is_empty()) else {
        return relative_path.to_string();
    };

    if let Some(rest) = strip_leading_prefix(relative_path, prefix) {
        return rest.to_string();
    }

    let parts: Vec<&str> = relative_path.split(['/', '\\']).collect();
    match parts.iter().position(|part| *part == prefix) {
        Some(index) => parts
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, part)| *part)
            .collect::<Vec<_>>()
            .join("/"),
        None => relative_path.to_string(),
    }
}

/// Match `prefix` at the start of `path`, treating `/` and `\` as the same
/// separator, and require a separator right after it.
fn strip_leading_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let is_sep = |c: char| c == '/' || c == '\\';
    let mut path_chars = path.char_indices();

    for expected in prefix.chars() {
        let (_, actual) = path_chars.next()?;
        let same = actual == expected || (is_sep(actual) && is_sep(expected));
        if !same {
            return None;
        }
    }

    match path_chars.next() {
        Some((index, c)) if is_sep(c) => Some(&path[index + c.len_utf8()..]),
        _ => None,
    }
}

/// Lexically normalize a path: drop `.` components and resolve `..` against
/// preceding normal components. Does not consult the filesystem, so the path
/// need not exist.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `path` against `base` (when relative) and normalize it.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Replace the extension of a `/`-separated relative path.
///
/// `format` may be given with or without its leading dot.
pub fn replace_extension(relative_path: &str, format: &str) -> String {
    let format = format.trim_start_matches('.');
    let (dir, file) = match relative_path.rfind('/') {
        Some(i) => (&relative_path[..=i], &relative_path[i + 1..]),
        None => ("", relative_path),
    };
    let stem = match file.rfind('.') {
        Some(i) if i > 0 => &file[..i],
        _ => file,
    };
    format!("{dir}{stem}.{format}")
}

/// Strip the final extension from a `/`-separated relative path.
pub fn strip_extension(relative_path: &str) -> &str {
    let file_start = relative_path.rfind('/').map_or(0, |i| i + 1);
    match relative_path[file_start..].rfind('.') {
        Some(i) if i > 0 => &relative_path[..file_start + i],
        _ => relative_path,
    }
}

/// Output-relative path of a source document: relative to `docs_root` (or to
/// `src_root` when the file lives outside it), strip-prefix applied, extension
/// replaced by `format`. The pipeline and the selective cleaner both use this,
/// so a document always maps to exactly one output file.
pub fn output_relative_path(
    source: &Path,
    docs_root: &Path,
    src_root: &Path,
    strip_prefix: Option<&str>,
    format: &str,
) -> String {
    let relative = source
        .strip_prefix(docs_root)
        .or_else(|_| source.strip_prefix(src_root))
        .map(to_slash)
        .unwrap_or_else(|_| {
            source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
    replace_extension(&rewrite_path(&relative, strip_prefix), format)
}
