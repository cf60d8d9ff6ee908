//! "Component data" section regenerated from sidecar JSON records.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::patterns::{COMPONENT_DATA_HEADING, COMPONENT_DATA_RE};
use crate::source::FileSource;

/// One `<data_dir>/<Name>.json` record.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ComponentDataRecord {
    /// Component name, rendered as an H3.
    pub name: String,
    /// Type documentation link.
    #[serde(default, rename = "type")]
    pub type_info: Option<TypeInfo>,
    /// `(prop, default)` pairs in declaration order; `null` reads as none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub props: Vec<(String, serde_json::Value)>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Name and link of a component's type documentation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TypeInfo {
    pub name: String,
    pub link: String,
}

/// Where related component names and their records are looked up.
#[derive(Debug, Clone, Copy)]
pub struct ComponentDataSources<'a> {
    /// `<components_dir>/<component-dir>/*.svelte` names the related components.
    pub components_dir: &'a Path,
    /// `<data_dir>/<Name>.json` holds each record.
    pub data_dir: &'a Path,
    /// Dump replacement details when a rewrite fails.
    pub debug: bool,
}

/// Replace the `## Component data` section with one rendered from the records
/// of every component related to `component_title`.
///
/// Missing or unparsable records are skipped. If none resolve, or the section
/// cannot be located, the document is returned unchanged.
pub fn rewrite_component_data(
    md: &str,
    component_title: Option<&str>,
    sources: &ComponentDataSources<'_>,
    fs: &dyn FileSource,
) -> String {
    let Some(title) = component_title.filter(|t| !t.trim().is_empty()) else {
        return md.to_string();
    };
    let Some(section) = extract_section(md) else {
        return md.to_string();
    };

    let records = load_records(title, sources, fs);
    if records.is_empty() {
        debug!(component = %title, "no component data found");
        return md.to_string();
    }

    let rendered = render_section(&records);
    if !md.contains(section) {
        warn!(component = %title, "component data section replacement failed");
        if sources.debug {
            debug!(
                old_len = section.len(),
                new_len = rendered.len(),
                head = %section.chars().take(50).collect::<String>(),
                "component data section detail"
            );
        }
        return md.to_string();
    }

    debug!(component = %title, records = records.len(), "replacing component data section");
    md.replacen(section, &rendered, 1)
}

/// Raw section text: from the first `## Component data` heading that stands
/// alone on its line to just before the next line starting with `##`, or to
/// the end of the document.
fn extract_section(md: &str) -> Option<&str> {
    let heading = COMPONENT_DATA_RE.find(md)?;
    // Resume at the heading's line break so a heading right below still ends it.
    let body_start = heading.end() - 1;
    let end = md[body_start..]
        .find("\n##")
        .map_or(md.len(), |i| body_start + i);
    Some(&md[heading.start()..end])
}

/// `Button Group` → `button-group` directory, listing `*.svelte` names; falls
/// back to the PascalCase name when the directory cannot be listed.
fn component_names(title: &str, components_dir: &Path, fs: &dyn FileSource) -> Vec<String> {
    let dir_name = title.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
    let dir = components_dir.join(&dir_name);

    match fs.list_dir(&dir) {
        Ok(files) => files
            .iter()
            .filter_map(|f| f.strip_suffix(".svelte"))
            .map(String::from)
            .collect(),
        Err(e) => {
            let fallback = pascal_case(title);
            debug!(dir = %dir.display(), error = %e, %fallback, "component directory unreadable, using fallback name");
            vec![fallback]
        }
    }
}

fn pascal_case(title: &str) -> String {
    title
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => format!("{}{}", c.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect()
}

fn load_records(
    title: &str,
    sources: &ComponentDataSources<'_>,
    fs: &dyn FileSource,
) -> Vec<ComponentDataRecord> {
    component_names(title, sources.components_dir, fs)
        .into_iter()
        .filter_map(|name| {
            let path = sources.data_dir.join(format!("{name}.json"));
            let text = fs
                .read_to_string(&path)
                .map_err(|e| debug!(path = %path.display(), error = %e, "component data missing"))
                .ok()?;
            serde_json::from_str::<ComponentDataRecord>(&text)
                .map_err(|e| debug!(path = %path.display(), error = %e, "component data unparsable"))
                .ok()
        })
        .collect()
}

fn render_section(records: &[ComponentDataRecord]) -> String {
    let mut out = format!("{COMPONENT_DATA_HEADING}\n\n");

    for record in records {
        out.push_str(&format!("### {}\n\n", record.name));

        if let Some(type_info) = &record.type_info {
            out.push_str("#### Types\n\n");
            out.push_str(&format!("[{}]({})\n\n", type_info.name, type_info.link));
        }

        if !record.props.is_empty() {
            out.push_str("#### Props\n\n");
            for (prop, default) in &record.props {
                match default_text(default) {
                    Some(value) => out.push_str(&format!("- {prop}: {value}\n")),
                    None => out.push_str(&format!("- {prop}\n")),
                }
            }
            out.push('\n');
        }
    }

    out
}

/// Render a prop default; empty strings and `null` mean "no default".
fn default_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::MemorySource;

    fn sources() -> ComponentDataSources<'static> {
        ComponentDataSources {
            components_dir: Path::new("/site/src/lib"),
            data_dir: Path::new("/site/data"),
            debug: false,
        }
    }

    const ALERT_JSON: &str = r#"{
        "name": "Alert",
        "type": { "name": "AlertProps", "link": "https://example.com/types#alertprops" },
        "props": [["children", ""], ["color", "'primary'"], ["dismissable", false]]
    }"#;

    const DOC: &str = "# Alert\n\n## Component data\n\nplaceholder\n\n## References\n\nref";

    #[test]
    fn renders_records_for_listed_components() {
        let fs = MemorySource::default()
            .with("/site/src/lib/alert/Alert.svelte", "")
            .with("/site/src/lib/alert/index.ts", "")
            .with("/site/data/Alert.json", ALERT_JSON);

        let result = rewrite_component_data(DOC, Some("Alert"), &sources(), &fs);
        assert_eq!(
            result,
            "# Alert\n\n## Component data\n\n### Alert\n\n#### Types\n\n\
             [AlertProps](https://example.com/types#alertprops)\n\n\
             #### Props\n\n- children\n- color: 'primary'\n- dismissable: false\n\n\
             \n## References\n\nref"
        );
    }

    #[test]
    fn falls_back_to_pascal_case_name() {
        let fs = MemorySource::default().with(
            "/site/data/ButtonGroup.json",
            r#"{ "name": "ButtonGroup" }"#,
        );
        let result = rewrite_component_data(DOC, Some("button group"), &sources(), &fs);
        assert!(result.contains("### ButtonGroup\n\n"));
        assert!(!result.contains("#### Props"));
        assert!(!result.contains("placeholder"));
    }

    #[test]
    fn skips_missing_and_invalid_records() {
        let fs = MemorySource::default()
            .with("/site/src/lib/alert/Alert.svelte", "")
            .with("/site/src/lib/alert/AlertBroken.svelte", "")
            .with("/site/src/lib/alert/AlertMissing.svelte", "")
            .with("/site/data/Alert.json", ALERT_JSON)
            .with("/site/data/AlertBroken.json", "{ not json");

        let result = rewrite_component_data(DOC, Some("Alert"), &sources(), &fs);
        let records = result.lines().filter(|l| l.starts_with("### ")).count();
        assert_eq!(records, 1);
        assert!(result.contains("### Alert\n"));
    }

    #[test]
    fn no_records_preserves_original_section() {
        let fs = MemorySource::default();
        assert_eq!(rewrite_component_data(DOC, Some("Alert"), &sources(), &fs), DOC);
    }

    #[test]
    fn without_title_or_heading_is_identity() {
        let fs = MemorySource::default().with("/site/data/Alert.json", ALERT_JSON);
        assert_eq!(rewrite_component_data(DOC, None, &sources(), &fs), DOC);
        assert_eq!(rewrite_component_data(DOC, Some(""), &sources(), &fs), DOC);
        let no_heading = "# Alert\n\n## Usage\n";
        assert_eq!(
            rewrite_component_data(no_heading, Some("Alert"), &sources(), &fs),
            no_heading
        );
    }

    #[test]
    fn section_at_end_of_document() {
        let fs = MemorySource::default().with("/site/data/Alert.json", ALERT_JSON);
        let doc = "# Alert\n\n## Component data\n\nold";
        let result = rewrite_component_data(doc, Some("Alert"), &sources(), &fs);
        assert!(!result.contains("old"));
        assert!(result.ends_with("- dismissable: false\n\n"));
    }

    #[test]
    fn extract_section_requires_line_break_after_heading() {
        assert_eq!(extract_section("## Component data is great"), None);
        assert_eq!(
            extract_section("## Component data\nx\n## Next"),
            Some("## Component data\nx")
        );
        assert_eq!(
            extract_section("## Component data\n## Next"),
            Some("## Component data")
        );
    }

    #[test]
    fn extract_section_skips_inline_mentions() {
        let md = "## Component data is generated\n\ntext\n\n## Component data\n\nold\n\n## Next";
        assert_eq!(extract_section(md), Some("## Component data\n\nold\n"));
    }

    #[test]
    fn null_props_still_render_record() {
        let fs = MemorySource::default().with(
            "/site/data/Alert.json",
            r#"{
                "name": "Alert",
                "type": { "name": "AlertProps", "link": "https://example.com/types#alertprops" },
                "props": null
            }"#,
        );
        let result = rewrite_component_data(DOC, Some("Alert"), &sources(), &fs);
        assert!(result.contains(
            "### Alert\n\n#### Types\n\n[AlertProps](https://example.com/types#alertprops)\n\n"
        ));
        assert!(!result.contains("#### Props"));
        assert!(!result.contains("placeholder"));
    }

    #[test]
    fn pascal_case_from_title() {
        assert_eq!(pascal_case("button group"), "ButtonGroup");
        assert_eq!(pascal_case("Alert"), "Alert");
    }
}
