//! Heading-delimited section removal.

use crate::patterns::heading;

/// Drop every section whose heading title is in `titles`.
///
/// A title matches either bare (`Installation`) or with its hashes
/// (`## Installation`). An ignored section runs until the next heading of the
/// same or a shallower depth, or to the end of the document; its nested
/// subsections go with it. All other lines, blank ones included, are kept
/// verbatim.
pub fn remove_sections(md: &str, titles: &[String]) -> String {
    if titles.is_empty() {
        return md.to_string();
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut ignoring = false;
    let mut ignored_depth = 0;

    for line in md.split('\n') {
        if let Some((depth, title)) = heading(line) {
            if ignoring && depth <= ignored_depth {
                ignoring = false;
            }

            let hashed = format!("{} {title}", "#".repeat(depth));
            if titles.iter().any(|t| t == title || *t == hashed) {
                ignoring = true;
                ignored_depth = depth;
                continue;
            }
        }

        if !ignoring {
            kept.push(line);
        }
    }

    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_ignore_list_is_identity() {
        let input = "## A\ntext\n\n## B\n";
        assert_eq!(remove_sections(input, &[]), input);
    }

    #[test]
    fn removes_nested_subsections() {
        let input = "## A\n\n### B\nX\n\n## C\nY";
        let result = remove_sections(input, &titles(&["A"]));
        assert!(result.contains("## C\nY"));
        assert!(!result.contains("### B"));
        assert!(!result.contains('X'));
    }

    #[test]
    fn removes_section_running_to_end_of_document() {
        let input = "# Title\n\nIntro\n\n## Installation\nnpm install package\n\nmore";
        let result = remove_sections(input, &titles(&["Installation"]));
        assert_eq!(result, "# Title\n\nIntro\n");
    }

    #[test]
    fn matches_hash_prefixed_titles_at_that_depth_only() {
        let input = "## API\nkeep?\n### API\nnested";
        let result = remove_sections(input, &titles(&["### API"]));
        assert_eq!(result, "## API\nkeep?");
    }

    #[test]
    fn deeper_heading_does_not_end_section() {
        let input = "### Deep\nx\n#### Deeper\ny\n### Next\nz";
        let result = remove_sections(input, &titles(&["Deep"]));
        assert_eq!(result, "### Next\nz");
    }

    #[test]
    fn shallower_heading_ends_section_and_can_start_another() {
        let input = "## A\na\n# B\nb\n## C\nc";
        let result = remove_sections(input, &titles(&["A", "B"]));
        assert_eq!(result, "");
    }

    #[test]
    fn keeps_blank_lines_outside_ignored_sections() {
        let input = "\n# Main Title\n\n## Introduction\nSome intro text\n\n## Installation\nnpm install package\n\n## Usage\nHow to use\n";
        let result = remove_sections(input, &titles(&["Installation"]));
        assert_eq!(
            result,
            "\n# Main Title\n\n## Introduction\nSome intro text\n\n## Usage\nHow to use\n"
        );
    }
}
