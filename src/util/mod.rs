use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::meta::MetaValue;

pub mod date;
pub mod front_matter;
pub mod fs;

/// Slug of a post folder: the leading `YYYY-MM-DD-` is removed and dashes become spaces.
/// No case folding and no character stripping happen here.
pub fn extract_slug(folder_name: &str) -> String {
    lazy_static! {
        static ref DATE_PREFIX_REGEX: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}-").unwrap();
    }
    DATE_PREFIX_REGEX.replace(folder_name, "").replace('-', " ")
}

/// Coerces a scalar or a list into a list of trimmed, non-empty strings.
/// A scalar string is wrapped as a single element, commas are not separators.
pub fn normalize_array(value: Option<&MetaValue>) -> Vec<String> {
    let items: Vec<&MetaValue> = match value {
        None | Some(MetaValue::Null) => return vec![],
        Some(MetaValue::List(items)) => items.iter().collect(),
        Some(other) => vec![other],
    };

    items.into_iter()
        .filter_map(|item| item.scalar_text())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn is_folder_post(path: &Path, content_file: &str) -> bool {
    path.to_string_lossy().contains(content_file)
}

/// True when one of the known documents lives directly in `folder`.
pub fn post_exists_for_folder<P: AsRef<Path>>(document_paths: &[P], folder: &Path) -> bool {
    document_paths.iter()
        .any(|path| path.as_ref().parent() == Some(folder))
}

/// Name of the directory holding `path`, e.g. the post folder name for a `content.md`.
pub fn parent_dir_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_extract_slug() {
        assert_eq!(extract_slug("2024-03-01-hello-world"), "hello world");
        assert_eq!(extract_slug("2024-03-01-trip"), "trip");
        assert_eq!(extract_slug("no-date-here"), "no date here");
        assert_eq!(extract_slug("Mixed-Case-2024-03-01-x"), "Mixed Case 2024 03 01 x");
        assert_eq!(extract_slug("2024-03-01-"), "");
        assert_eq!(extract_slug("٢٠٢٤-٠٣-٠١-trip"), "٢٠٢٤ ٠٣ ٠١ trip");
    }

    #[test]
    fn test_normalize_array() {
        assert_eq!(normalize_array(None), Vec::<String>::new());
        assert_eq!(normalize_array(Some(&MetaValue::Null)), Vec::<String>::new());

        let tags = MetaValue::List(vec![
            MetaValue::from(" rust "),
            MetaValue::from(""),
            MetaValue::from("  "),
            MetaValue::Integer(2024),
            MetaValue::from("blog"),
        ]);
        assert_eq!(normalize_array(Some(&tags)), ["rust", "2024", "blog"]);

        let single = MetaValue::from("a, b ,, c");
        assert_eq!(normalize_array(Some(&single)), ["a, b ,, c"]);

        assert_eq!(normalize_array(Some(&MetaValue::from("   "))), Vec::<String>::new());
    }

    #[test]
    fn test_folder_post_detection() {
        assert!(is_folder_post(Path::new("_posts/2024-03-01-trip/content.md"), "content.md"));
        assert!(!is_folder_post(Path::new("_posts/2024-03-01-trip.md"), "content.md"));
    }

    #[test]
    fn test_post_exists_for_folder() {
        let paths = vec![
            PathBuf::from("site/_posts/2024-03-01-trip/content.md"),
            PathBuf::from("site/_posts/2024-01-01-flat.md"),
        ];
        assert!(post_exists_for_folder(&paths, Path::new("site/_posts/2024-03-01-trip")));
        assert!(!post_exists_for_folder(&paths, Path::new("site/_posts/2024-03-02-other")));
        assert!(post_exists_for_folder(&paths, Path::new("site/_posts")));
    }

    #[test]
    fn test_parent_dir_name() {
        let path = PathBuf::from("_posts/2024-03-01-trip/content.md");
        assert_eq!(parent_dir_name(&path), Some("2024-03-01-trip".to_string()));
    }
}
