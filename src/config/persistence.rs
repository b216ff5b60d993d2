//! Reading and writing the settings file
//!
//! Settings live as pretty-printed JSON under the platform config
//! directory (`~/.config/slidemark/config.json` on Linux). Loading from
//! the default location never fails: anything unusable degrades to
//! defaults with a warning. Explicit paths report their errors.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "slidemark";
const CONFIG_FILE_NAME: &str = "config.json";
/// Extension of the staging file written before the final rename
const STAGING_EXTENSION: &str = "json.tmp";

/// Platform config directory for slidemark.
pub fn get_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(Error::ConfigDirNotFound)?;
    Ok(base.join(APP_DIR))
}

pub fn get_config_file_path() -> Result<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Settings from the user config file, or defaults if that is missing or broken.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Could not load settings")
}

/// Settings from `path`. A missing or blank file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Settings> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(err) => return Err(Error::config_load(path, err)),
    };

    if text.trim().is_empty() {
        debug!("Settings file {} is blank", path.display());
        return Ok(Settings::default());
    }

    match Settings::from_json_sanitized(&text) {
        Ok(settings) => {
            info!("Loaded settings from {}", path.display());
            Ok(settings)
        }
        Err(err) => {
            warn!("Ignoring malformed settings in {}: {}", path.display(), err);
            Err(err.into())
        }
    }
}

/// Write `settings` to the user config file.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(settings, &get_config_file_path()?)
}

/// Write `settings` to `path`, staging the JSON in a sibling file and
/// renaming it over the target so readers never see a partial file.
pub fn save_config_to(settings: &Settings, path: &Path) -> Result<()> {
    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir).map_err(|err| Error::config_save(dir, err))?;
    }

    let json = serde_json::to_string_pretty(settings).map_err(|err| Error::config_save(path, err))?;
    let staging = path.with_extension(STAGING_EXTENSION);
    fs::write(&staging, json).map_err(|err| Error::config_save(&staging, err))?;
    fs::rename(&staging, path).map_err(|err| Error::config_save(path, err))?;

    info!("Saved settings to {}", path.display());
    Ok(())
}
