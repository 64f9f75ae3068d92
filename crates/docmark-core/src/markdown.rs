//! Frontmatter handling and title extraction for Markdown sources.

use serde_json::Value;

/// Frontmatter syntax, identified by its fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FrontmatterFormat {
    /// `---` fenced YAML.
    #[strum(serialize = "yaml")]
    Yaml,
    /// `+++` fenced TOML.
    #[strum(serialize = "toml")]
    Toml,
}

impl FrontmatterFormat {
    fn fence_char(self) -> char {
        match self {
            FrontmatterFormat::Yaml => '-',
            FrontmatterFormat::Toml => '+',
        }
    }

    /// Whether `line` is a fence: three or more fence characters, then
    /// optional trailing whitespace.
    fn is_fence(self, line: &str) -> bool {
        let fence = self.fence_char();
        let marks = line.chars().take_while(|c| *c == fence).count();
        marks >= 3 && line[marks..].trim().is_empty()
    }

    fn parse(self, raw: &str) -> Result<Value, String> {
        match self {
            FrontmatterFormat::Yaml => serde_yaml::from_str(raw).map_err(|e| e.to_string()),
            FrontmatterFormat::Toml => toml::from_str(raw).map_err(|e| e.to_string()),
        }
    }
}

/// A leading metadata block removed from a Markdown document.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    pub format: FrontmatterFormat,
    /// Block text between the fences.
    pub raw: String,
    /// Parsed block, `None` when it did not parse.
    pub metadata: Option<Value>,
}

impl Frontmatter {
    /// The `title` key, when present and a string.
    pub fn title(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("title")?.as_str()
    }
}

/// Split leading frontmatter from a Markdown document.
///
/// The document is trimmed first; the returned body is trimmed as well.
/// A block without a closing fence is not frontmatter. A block that fails to
/// parse is still removed, with `metadata` left empty.
pub fn strip_frontmatter(text: &str) -> (Option<Frontmatter>, String) {
    let text = text.trim();
    let Some((first, rest)) = split_first_line(text) else {
        return (None, text.to_string());
    };

    let format = [FrontmatterFormat::Yaml, FrontmatterFormat::Toml]
        .into_iter()
        .find(|f| f.is_fence(first));
    let Some(format) = format else {
        return (None, text.to_string());
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if format.is_fence(line.trim_end_matches(['\n', '\r'])) {
            let raw = &rest[..offset];
            let body = rest[offset + line.len()..].trim();
            let metadata = match format.parse(raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(format = %format, error = %e, "Ignoring unparseable frontmatter");
                    None
                }
            };
            let frontmatter = Frontmatter {
                format,
                raw: raw.to_string(),
                metadata,
            };
            return (Some(frontmatter), body.to_string());
        }
        offset += line.len();
    }

    (None, text.to_string())
}

fn split_first_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.find('\n') {
        Some(idx) => Some((text[..idx].trim_end_matches('\r'), &text[idx + 1..])),
        None => Some((text, "")),
    }
}

/// The text of the first level-one ATX heading (`# Title`), if any.
pub fn extract_title(markdown: &str) -> Option<String> {
    markdown.lines().find_map(|line| {
        let title = line.trim_start().strip_prefix("# ")?.trim();
        let title = title.trim_end_matches('#').trim_end();
        (!title.is_empty()).then(|| title.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_frontmatter() {
        let (fm, body) = strip_frontmatter("---\ntitle: Notes\ntags: [a]\n---\n\n# Heading\n\nText\n");
        let fm = fm.unwrap();
        assert_eq!(fm.format, FrontmatterFormat::Yaml);
        assert_eq!(fm.title(), Some("Notes"));
        assert_eq!(fm.metadata.unwrap()["tags"], json!(["a"]));
        assert_eq!(body, "# Heading\n\nText");
    }

    #[test]
    fn test_toml_frontmatter() {
        let (fm, body) = strip_frontmatter("+++\ntitle = \"Plan\"\n+++\nBody");
        let fm = fm.unwrap();
        assert_eq!(fm.format, FrontmatterFormat::Toml);
        assert_eq!(fm.title(), Some("Plan"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = strip_frontmatter("\n# Title\n\nbody\n\n");
        assert!(fm.is_none());
        assert_eq!(body, "# Title\n\nbody");
    }

    #[test]
    fn test_unclosed_fence_is_content() {
        let (fm, body) = strip_frontmatter("---\ntitle: x\nno closing fence");
        assert!(fm.is_none());
        assert_eq!(body, "---\ntitle: x\nno closing fence");
    }

    #[test]
    fn test_unparseable_frontmatter_removed() {
        let (fm, body) = strip_frontmatter("---\n: : [\n---\ncontent");
        let fm = fm.unwrap();
        assert!(fm.metadata.is_none());
        assert_eq!(body, "content");
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = strip_frontmatter("---\n---\ncontent");
        assert_eq!(fm.unwrap().raw, "");
        assert_eq!(body, "content");
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title("intro\n# Main Title\n## Sub"), Some("Main Title".into()));
        assert_eq!(extract_title("## Only sub\ntext"), None);
        assert_eq!(extract_title("#NoSpace"), None);
        assert_eq!(extract_title("# Closed #"), Some("Closed".into()));
        assert_eq!(extract_title(""), None);
    }
}
