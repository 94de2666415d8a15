use std::path::PathBuf;

/// Directory name used under the OS config directory.
pub const APP_DIR_NAME: &str = "VRChatInstanceJoiner";

/// Expands a leading `~` in a path to the user's home directory.
/// Also normalizes path separators for the current OS.
pub fn expand_tilde(path: &str) -> String {
    let result = if path.starts_with("~/") || path == "~" {
        match dirs::home_dir() {
            Some(home) if path == "~" => home.to_string_lossy().to_string(),
            Some(home) => home.join(&path[2..]).to_string_lossy().to_string(),
            None => path.to_string(),
        }
    } else {
        path.to_string()
    };
    if cfg!(windows) {
        result.replace('/', "\\")
    } else {
        result
    }
}

/// Resolves the data directory: an explicit override wins, otherwise
/// `<config dir>/VRChatInstanceJoiner`, falling back to the home directory.
pub fn resolve_data_dir(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(dir) = explicit.filter(|d| !d.trim().is_empty()) {
        return Some(PathBuf::from(expand_tilde(dir.trim())));
    }
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join(APP_DIR_NAME))
}

/// Turns an arbitrary record key into a file stem that is valid on every
/// platform. Each invalid character becomes `_`.
pub fn sanitize_key(key: &str) -> String {
    let sanitized: String = key
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}
