//! Centralized path resolution for semactl
//!
//! # Environment Variables
//!
//! - `SEMACTL_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/semactl`)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `SEMACTL_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/semactl` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\semactl`
//!    - macOS/Linux: `~/.config/semactl`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "SEMACTL_CONFIG_DIR";

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Get the semactl config directory path
pub fn config_dir() -> Result<PathBuf> {
    // 1. Check environment variable override
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    // 2. Check XDG_CONFIG_HOME
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("semactl");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    // 3. Platform default
    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join("semactl");
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    // Unix default: ~/.config/semactl
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("semactl");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the default config file path
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables are left as-is.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Serialize tests that read or write process environment variables
#[cfg(test)]
pub fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::thread;

    /// Helper to run a test with temporary env var
    ///
    /// Holds [`env_lock`] for the whole call, so no other env test runs
    /// concurrently.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = env_lock();
        let original = env::var(key).ok();
        // SAFETY: env access in tests is serialized by env_lock()
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: as above
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        with_env_var(ENV_CONFIG_DIR, "/custom/semactl", || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/semactl"));
            assert_eq!(
                config_file().unwrap(),
                PathBuf::from("/custom/semactl/config.toml")
            );
        });
    }

    #[test]
    fn test_expand_with_tilde() {
        let _guard = env_lock();
        let result = expand("~/inventories/prod.yml");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("inventories").join("prod.yml"));
    }

    #[test]
    fn test_expand_with_env_var() {
        with_env_var("SEMACTL_TEST_VAR", "test_value", || {
            let result = expand("/path/$SEMACTL_TEST_VAR/file");
            assert_eq!(result, PathBuf::from("/path/test_value/file"));
        });
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let _guard = env_lock();
        let result = expand("/path/$NONEXISTENT_VAR_12345/file");
        assert_eq!(result, PathBuf::from("/path/$NONEXISTENT_VAR_12345/file"));
    }

    #[test]
    fn test_with_env_var_is_serialized() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                thread::spawn(move || {
                    let value = format!("value-{i}");
                    with_env_var("SEMACTL_TEST_PARALLEL", &value, || {
                        thread::yield_now();
                        assert_eq!(env::var("SEMACTL_TEST_PARALLEL").unwrap(), value);
                    });
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        let _guard = env_lock();
        assert!(env::var("SEMACTL_TEST_PARALLEL").is_err());
    }
}
