use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Paths {
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,
}

/// Which slug places assets and rewrites image links.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlugSource {
    /// Derived from the post folder name, whatever the front matter says.
    #[default]
    Folder,
    /// The document's final `slug` field.
    Document,
}

/// What a failing asset copy does to the rest of the copy pass.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetErrors {
    #[default]
    Abort,
    Skip,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Defaults {
    pub content_file: String,
    pub asset_dir: String,
    pub placeholder_extension: String,
    pub output_dir: String,
    pub layout: String,
    pub slug_source: SlugSource,
    pub asset_errors: AssetErrors,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            content_file: "content.md".to_string(),
            asset_dir: "pic".to_string(),
            placeholder_extension: ".txt".to_string(),
            output_dir: "posts".to_string(),
            layout: "post".to_string(),
            slug_source: SlugSource::Folder,
            asset_errors: AssetErrors::Abort,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub log: Option<Log>,
}

fn default_posts_dir() -> String {
    "_posts".to_string()
}

impl Config {
    pub fn new(source: &Path, destination: &Path) -> Config {
        Config {
            paths: Paths {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                posts_dir: default_posts_dir(),
            },
            defaults: Defaults::default(),
            log: None,
        }
    }

    /// `<source>/<posts_dir>`
    pub fn posts_root(&self) -> PathBuf {
        self.paths.source.join(&self.paths.posts_dir)
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_string_lossy().to_string()));
    match exe_dir {
        Some(exe_dir) => PathBuf::from(path.to_string_lossy().replace("${exe_dir}", &exe_dir)),
        None => path,
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths.source = parse_path(cfg.paths.source);
    cfg.paths.destination = parse_path(cfg.paths.destination);
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path);
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
