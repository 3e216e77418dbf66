use std::env;
use std::path::PathBuf;

const APP_DIR_NAME: &str = "flashdrill";

/// 应用数据目录：优先 `$XDG_DATA_HOME/flashdrill`，否则 `$HOME/.local/share/flashdrill`
pub fn get_app_data_dir() -> PathBuf {
    if let Some(dir) = env::var_os("XDG_DATA_HOME").filter(|d| !d.is_empty()) {
        return PathBuf::from(dir).join(APP_DIR_NAME);
    }

    let mut path = env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(".local/share");
    path.push(APP_DIR_NAME);
    path
}

pub fn get_database_path() -> PathBuf {
    let mut path = get_app_data_dir();
    path.push("flashdrill.db");
    path
}

pub fn get_config_path() -> PathBuf {
    let mut path = get_app_data_dir();
    path.push("config.json");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_data_dir() {
        let dir = get_app_data_dir();
        assert!(dir.ends_with(APP_DIR_NAME));
        assert_eq!(get_database_path().parent(), Some(dir.as_path()));
        assert_eq!(get_config_path().file_name().unwrap(), "config.json");
    }
}
