use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use spdlog::{error, warn};

use crate::meta::{mapping_to_metadata, Metadata};

/// Parsers tried in order on a front matter block, until one accepts it.
/// Both load YAML; they differ only in which documents they accept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParserStrategy {
    /// Plain YAML mapping. Application tags such as `!ruby/object` are refused.
    Strict,
    /// Same loader with every tag stripped down to its plain value.
    Permissive,
}

pub const PARSER_STRATEGIES: [ParserStrategy; 2] = [ParserStrategy::Strict, ParserStrategy::Permissive];

impl ParserStrategy {
    pub fn parse(&self, text: &str) -> Result<Metadata, String> {
        let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
        if *self == ParserStrategy::Strict {
            if let Some(tag) = find_tag(&value) {
                return Err(format!("tag {} is not allowed", tag));
            }
        }
        match value {
            serde_yaml::Value::Null => Ok(Metadata::new()),
            serde_yaml::Value::Mapping(mapping) => Ok(mapping_to_metadata(mapping)),
            other => Err(format!("front matter is not a mapping: {:?}", other)),
        }
    }
}

fn find_tag(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::Tagged(tagged) => Some(tagged.tag.to_string()),
        Value::Sequence(seq) => seq.iter().find_map(find_tag),
        Value::Mapping(mapping) => mapping.iter()
            .find_map(|(k, v)| find_tag(k).or_else(|| find_tag(v))),
        _ => None,
    }
}

/// Splits a content file into its `---` delimited front matter block and the body.
/// The block keeps its opening delimiter. Without a block the whole input is the body.
pub fn split_content(content: &str) -> (Option<&str>, &str) {
    // Lazy on purpose: the first closing `---` ends the block, later ones are body rules.
    lazy_static! {
        static ref FRONT_MATTER_REGEX: Regex = Regex::new(
            r"(?ms)\A(---\s*\n.*?\n?)^---\s*\n\n?(.*)\z"
        ).unwrap();
    }

    match FRONT_MATTER_REGEX.captures(content) {
        Some(caps) => {
            let front_matter = caps.get(1).map(|m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str());
            (front_matter, body)
        }
        None => (None, content),
    }
}

/// Runs the parser strategies in order. A failed strict parse is a warning, running out of
/// strategies is an error and gives `None`.
pub fn parse_front_matter(text: &str, source: &Path) -> Option<Metadata> {
    let last = PARSER_STRATEGIES.len() - 1;
    for (i, strategy) in PARSER_STRATEGIES.iter().enumerate() {
        match strategy.parse(text) {
            Ok(data) => return Some(data),
            Err(e) if i == last => {
                error!("Failed to parse YAML in {}: {}", source.display(), e);
            }
            Err(e) => {
                warn!("Error parsing YAML in {}: {}", source.display(), e);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::meta::MetaValue;
    use crate::test_data::{install_test_logger, log_lines, CONTENT_MD, CONTENT_MD_NO_FRONT_MATTER};

    use super::*;

    #[test]
    fn test_split_content() {
        let (front_matter, body) = split_content(CONTENT_MD);
        assert_eq!(front_matter, Some("---\ntitle: \"Hi\"\ntags:\n  - travel\n  - \" food \"\n"));
        assert_eq!(body, "A short trip.\n\n![a cat](pic/cat.png)\n\n---\n\nAfter the break.\n");
    }

    #[test]
    fn test_split_without_blank_line() {
        let (front_matter, body) = split_content("---\nlayout: page\n---\nBody\n");
        assert_eq!(front_matter, Some("---\nlayout: page\n"));
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_split_without_front_matter() {
        let (front_matter, body) = split_content(CONTENT_MD_NO_FRONT_MATTER);
        assert_eq!(front_matter, None);
        assert_eq!(body, CONTENT_MD_NO_FRONT_MATTER);

        let unterminated = "---\ntitle: Hi\nno closing line";
        assert_eq!(split_content(unterminated), (None, unterminated));
    }

    #[test]
    fn test_split_empty_front_matter() {
        let (front_matter, body) = split_content("---\n---\nBody");
        assert_eq!(front_matter, Some("---\n"));
        assert_eq!(body, "Body");
        assert_eq!(parse_front_matter("---\n", Path::new("content.md")), Some(Metadata::new()));
    }

    #[test]
    fn test_strict_parse() {
        let data = parse_front_matter("---\ntitle: Hi\ndate: 2024-03-01\n", Path::new("content.md")).unwrap();
        assert_eq!(data["title"], MetaValue::from("Hi"));
        assert_eq!(data["date"], MetaValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }

    #[test]
    fn test_strict_rejects_scalar_document() {
        assert!(ParserStrategy::Strict.parse("just a sentence").is_err());
    }

    #[test]
    fn test_permissive_strips_tags() {
        let text = "title: !custom Hi\ntags: [a, b]\n";
        assert!(ParserStrategy::Strict.parse(text).is_err());

        let data = ParserStrategy::Permissive.parse(text).unwrap();
        assert_eq!(data["title"], MetaValue::from("Hi"));
        assert_eq!(data["tags"], MetaValue::List(vec![MetaValue::from("a"), MetaValue::from("b")]));
        assert_eq!(parse_front_matter(text, Path::new("tagged/content.md")), Some(data));
    }

    #[test]
    fn test_text_that_is_not_yaml_fails_both() {
        install_test_logger();
        let source = Path::new("plain-text-header/content.md");
        let text = "title: Notes: part 2\n";
        assert_eq!(parse_front_matter(text, source), None);

        let lines = log_lines("plain-text-header/content.md");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[warn] Error parsing YAML in plain-text-header/content.md"));
        assert!(lines[1].contains("[error] Failed to parse YAML in plain-text-header/content.md"));
    }

    #[test]
    fn test_strict_success_logs_nothing() {
        install_test_logger();
        assert!(parse_front_matter("title: Hi\n", Path::new("quiet-strict/content.md")).is_some());
        assert!(log_lines("quiet-strict").is_empty());
    }

    #[test]
    fn test_fallback_success_only_warns() {
        install_test_logger();
        assert!(parse_front_matter("title: !custom Hi\n", Path::new("fallback-warn/content.md")).is_some());

        let lines = log_lines("fallback-warn");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[warn]"));
    }

    #[test]
    fn test_both_parsers_fail() {
        let text = "title: [unclosed\n  nested: x\n";
        assert!(ParserStrategy::Strict.parse(text).is_err());
        assert!(ParserStrategy::Permissive.parse(text).is_err());
        assert_eq!(parse_front_matter(text, Path::new("content.md")), None);
    }
}
