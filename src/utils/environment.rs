use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const APP_DIR_NAME: &str = ".adrian";
const LOG_DIR_NAME: &str = "log";

/// Get the per-user application directory (~/.adrian)
pub fn get_app_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine the home directory")?;
    Ok(app_dir_under(&home))
}

/// Get the log directory (~/.adrian/log)
pub fn get_log_dir() -> Result<PathBuf> {
    Ok(get_app_dir()?.join(LOG_DIR_NAME))
}

pub(crate) fn app_dir_under(home: &Path) -> PathBuf {
    home.join(APP_DIR_NAME)
}

/// Login name of the current user, used as default SMTP user and mail address
pub fn current_user() -> Option<String> {
    ["USER", "LOGNAME", "USERNAME"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|name| !name.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_dir_under_home() {
        let app_dir = app_dir_under(Path::new("/home/testuser"));
        assert_eq!(app_dir, PathBuf::from("/home/testuser/.adrian"));
    }

    #[test]
    fn test_log_dir_is_inside_app_dir() {
        // Only meaningful where a home directory can be determined
        if let (Ok(app_dir), Ok(log_dir)) = (get_app_dir(), get_log_dir()) {
            assert!(app_dir.ends_with(".adrian"));
            assert_eq!(log_dir, app_dir.join("log"));
        }
    }

    #[test]
    fn test_current_user_is_not_blank() {
        if let Some(user) = current_user() {
            assert!(!user.trim().is_empty());
        }
    }
}
