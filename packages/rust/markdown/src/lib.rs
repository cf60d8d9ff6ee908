//! Per-document transformation passes.
//!
//! A documentation page goes through a fixed sequence of text rewrites:
//! front-matter split, title injection, fence normalization, include
//! expansion, section removal, "See also" regeneration, "Component data"
//! regeneration, script removal and marker stripping. Each pass lives in its
//! own module and can be used on its own; [`transform`] runs them in order.

mod cleanup;
mod component_data;
mod frontmatter;
mod include;
mod patterns;
mod sections;
mod see_also;
mod source;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use docllm_shared::{Result, TransformContext};

pub use cleanup::{normalize_fences, remove_script_block, strip_marker_tags};
pub use component_data::{
    ComponentDataRecord, ComponentDataSources, TypeInfo, rewrite_component_data,
};
pub use frontmatter::{FrontMatter, split_front_matter};
pub use include::{IncludeResult, resolve_includes};
pub use sections::remove_sections;
pub use see_also::{LinkRewrite, rewrite_see_also};
pub use source::{FileSource, FsSource};

use frontmatter::non_empty;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Result of transforming one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Final document text.
    pub markdown: String,
    /// Front-matter title, if present and non-empty.
    pub title: Option<String>,
    /// Files pulled in by include directives.
    pub dependencies: BTreeSet<PathBuf>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run every pass over `raw`.
///
/// Include expansion must precede section removal so included headings can
/// be targeted, and script removal must follow the "See also" pass which
/// reads the script block. Only a malformed front-matter block is an error;
/// every later pass degrades in place.
#[instrument(skip_all, fields(path = %source_path.display()))]
pub fn transform(
    raw: &str,
    source_path: &Path,
    ctx: &TransformContext,
    fs: &dyn FileSource,
) -> Result<TransformOutput> {
    let (front_matter, body) = split_front_matter(raw)?;
    let title = non_empty(front_matter.title.as_deref()).map(String::from);

    let mut md = match &title {
        Some(title) => format!("# {title}\n\n{body}"),
        None => body.to_string(),
    };

    md = normalize_fences(&md);

    let included = resolve_includes(&md, source_path, ctx, fs);
    md = included.content;

    md = remove_sections(&md, &ctx.ignore);

    md = rewrite_see_also(
        &md,
        &LinkRewrite {
            prefix: &ctx.link_prefix,
            base: &ctx.link_base,
            format: &ctx.format,
        },
    );

    md = rewrite_component_data(
        &md,
        non_empty(front_matter.component_title.as_deref()),
        &ComponentDataSources {
            components_dir: &ctx.components_dir,
            data_dir: &ctx.data_dir,
            debug: ctx.debug,
        },
        fs,
    );

    md = remove_script_block(&md);
    md = strip_marker_tags(&md, &ctx.marker_tags);

    debug!(
        bytes = md.len(),
        includes = included.dependencies.len(),
        "document transformed"
    );

    Ok(TransformOutput {
        markdown: md,
        title,
        dependencies: included.dependencies,
    })
}
