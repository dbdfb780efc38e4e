//! Path helpers.

use std::path::PathBuf;

/// Get the data directory (e.g. `~/.cleverbot/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cleverbot")
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_path_ends_with_cleverbot() {
        assert!(get_data_path().ends_with(".cleverbot"));
    }
}
