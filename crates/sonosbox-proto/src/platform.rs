use std::path::PathBuf;

/// Default port of the playback service.
pub const DEFAULT_SERVER_PORT: u16 = 46864;
const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

pub fn default_server_url() -> String {
    format!("http://{}:{}", DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT)
}

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/sonosbox/ (XDG standard)
    // instead of macOS Application Support for consistency
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("sonosbox")
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sonosbox")
    }
}

pub fn config_dir() -> PathBuf {
    // On Windows, check for portable config.toml in executable directory first
    #[cfg(windows)]
    {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_config = exe_dir.join("config.toml");
                if portable_config.exists() {
                    return exe_dir.to_path_buf();
                }
            }
        }
    }

    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("sonosbox")
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sonosbox")
    }
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

pub fn log_path() -> PathBuf {
    data_dir().join("sonosbox.log")
}
