//! Category grouping for the bundle.

use std::collections::HashMap;

use docllm_shared::ProcessedDocument;

/// Category of documents whose path has no directory segment.
pub const OTHER_CATEGORY: &str = "other";

/// Documents of one category, sorted by relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub name: String,
    pub documents: Vec<&'a ProcessedDocument>,
}

/// First path segment that is not `docs` and is followed by more segments;
/// [`OTHER_CATEGORY`] otherwise.
///
/// `components/alert.md` → `components`, `docs/forms/toggle.md` → `forms`,
/// `intro.md` → `other`.
pub fn category_of(relative_path: &str) -> &str {
    let segments: Vec<&str> = relative_path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect();

    segments
        .iter()
        .enumerate()
        .find(|(i, s)| **s != "docs" && i + 1 < segments.len())
        .map_or(OTHER_CATEGORY, |(_, s)| *s)
}

/// Group documents by category.
///
/// Categories listed in `order` come first, in that order, skipping those with
/// no documents. Remaining categories follow in the order they were first seen
/// in `docs`.
pub fn group_by_category<'a>(
    docs: &'a [ProcessedDocument],
    order: &[String],
) -> Vec<CategoryGroup<'a>> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut by_category: HashMap<&str, Vec<&'a ProcessedDocument>> = HashMap::new();

    for doc in docs {
        let category = category_of(&doc.relative_path);
        by_category
            .entry(category)
            .or_insert_with(|| {
                first_seen.push(category);
                Vec::new()
            })
            .push(doc);
    }

    let ordered = order.iter().map(String::as_str);
    let unlisted = first_seen
        .iter()
        .copied()
        .filter(|c| !order.iter().any(|o| o == c));

    ordered
        .chain(unlisted)
        .filter_map(|name| {
            let mut documents = by_category.remove(name)?;
            documents.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
            Some(CategoryGroup {
                name: name.to_string(),
                documents,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::doc;

    fn order(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn names(groups: &[CategoryGroup<'_>]) -> Vec<String> {
        groups.iter().map(|g| g.name.clone()).collect()
    }

    #[test]
    fn test_category_of() {
        assert_eq!(category_of("components/alert.md"), "components");
        assert_eq!(category_of("docs/forms/toggle.md"), "forms");
        assert_eq!(category_of("forms\\inputs\\number.md"), "forms");
        assert_eq!(category_of("intro.md"), OTHER_CATEGORY);
        assert_eq!(category_of("docs/intro.md"), OTHER_CATEGORY);
    }

    #[test]
    fn test_configured_order_then_first_seen() {
        let docs = vec![
            doc("utilities/close.md"),
            doc("blocks/hero.md"),
            doc("intro.md"),
            doc("components/badge.md"),
            doc("components/alert.md"),
            doc("pages/quickstart.md"),
        ];
        let groups = group_by_category(&docs, &order(&["pages", "components", "forms", "utilities"]));

        assert_eq!(
            names(&groups),
            vec!["pages", "components", "utilities", "blocks", "other"]
        );
        let components: Vec<&str> = groups[1]
            .documents
            .iter()
            .map(|d| d.relative_path.as_str())
            .collect();
        assert_eq!(components, vec!["components/alert.md", "components/badge.md"]);
    }

    #[test]
    fn test_single_segment_paths_go_to_other() {
        let docs = vec![doc("intro.md")];
        let groups = group_by_category(&docs, &order(&["pages"]));
        assert_eq!(names(&groups), vec![OTHER_CATEGORY]);
    }

    #[test]
    fn test_duplicate_order_entries_do_not_duplicate_groups() {
        let docs = vec![doc("pages/a.md")];
        let groups = group_by_category(&docs, &order(&["pages", "pages"]));
        assert_eq!(groups.len(), 1);
    }
}
