use std::env;
use std::path::PathBuf;

use travelog::config::{read_config, Config};

use crate::CFG_FILE_NAME;

/// Looks for the config next to the executable, then in the current dir,
/// then in the user config dir.
pub(crate) fn get_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));
    let cur_dir = env::current_dir().ok();

    [exe_dir, cur_dir, dirs::config_dir()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let config_path = match cfg_path.or_else(get_config_path) {
        Some(path) => path,
        None => return Err("Could not find Travelog configuration".to_string()),
    };

    println!("Reading config from {}", config_path.display());
    let mut config = read_config(&config_path).map_err(|e| e.to_string())?;

    if let Some(ref mut log) = config.log {
        if log.location.is_none() {
            log.location = dirs::cache_dir()
                .map(|dir| dir.join("Travelog").join("log").join("server.log"));
        }
        match log.location {
            Some(ref location) => println!("Log enabled. Files will be written in {}", location.display()),
            None => println!("Log enabled. No cache dir found, using stdout"),
        }
    } else {
        println!("Log section missing. Using stdout");
    }

    Ok(config)
}
