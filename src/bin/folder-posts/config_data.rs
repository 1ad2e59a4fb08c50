use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

const CONFIG_SAMPLE: &str = r#"# For the file locations, If you want it to be relative to the executable directory
# use ${exe_dir}/location
[paths]
source = "."
destination = "_site"
posts_dir = "_posts"

# Post folder layout: <posts_dir>/<folder>/content.md and <posts_dir>/<folder>/pic/*
[defaults]
content_file = "content.md"
asset_dir = "pic"
placeholder_extension = ".txt"
output_dir = "posts"
layout = "post"
# folder: slug from the folder name. document: the post's final slug field
slug_source = "folder"
# abort: first failed asset copy stops the pass. skip: log it and go on
asset_errors = "abort"

#[log]
#level = "Info"
#log_to_console = true
#location = "folder-posts.log"
"#;

pub(crate) fn sample_cfg() -> &'static str {
    CONFIG_SAMPLE
}

pub(crate) fn write_sample_cfg(file_path: &Path) -> Result<()> {
    let mut file = File::create(file_path)
        .with_context(|| format!("Unable to create {}", file_path.display()))?;
    file.write_all(CONFIG_SAMPLE.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use folder_posts::config::{parse_config, AssetErrors, Defaults, SlugSource};

    use super::*;

    #[test]
    fn test_sample_is_valid() {
        let cfg = parse_config(sample_cfg()).unwrap();
        assert_eq!(cfg.defaults, Defaults::default());
        assert_eq!(cfg.defaults.slug_source, SlugSource::Folder);
        assert_eq!(cfg.defaults.asset_errors, AssetErrors::Abort);
        assert!(cfg.log.is_none());
    }
}
