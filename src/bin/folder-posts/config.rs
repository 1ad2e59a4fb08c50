use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use spdlog::info;

use folder_posts::config::{read_config, Config};

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    let cur_dir = env::current_dir().ok();
    let cfg_dir = dirs::config_dir().map(|dir| dir.join("folder-posts"));

    [exe_dir, cur_dir, cfg_dir].into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// Config file lookup: explicit path, executable dir, current dir, user config dir.
/// With no file, `--source` alone is enough and the destination defaults to `<source>/_site`.
pub(crate) fn open_config(cfg_path: Option<PathBuf>, source: Option<PathBuf>,
                          destination: Option<PathBuf>) -> Result<Config> {
    let config_path = cfg_path.or_else(get_config_path);

    let mut config = match (config_path, &source) {
        (Some(path), _) => {
            info!("Reading config from {}", path.display());
            read_config(&path).with_context(|| format!("Unable to load {}", path.display()))?
        }
        (None, Some(source)) => Config::new(source, &source.join("_site")),
        (None, None) => return Err(anyhow!("Could not find {} and no --source was given", CFG_FILE_NAME)),
    };

    if let Some(source) = source {
        config.paths.source = source;
    }
    if let Some(destination) = destination {
        config.paths.destination = destination;
    }

    Ok(config)
}
