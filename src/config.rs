//! Configuration constants and utilities for typewriter

/// Default log file; the terminal itself belongs to the UI
pub const DEFAULT_LOG_FILE: &str = "~/.typewriter/typewriter.log";

/// Environment variable name for overriding the log file path
pub const LOG_FILE_ENV_VAR: &str = "TYPEWRITER_LOG_FILE";

/// Environment variable holding the tracing filter directives
pub const LOG_LEVEL_ENV_VAR: &str = "TYPEWRITER_LOG_LEVEL";

/// Get the log file path, checking environment variable first, then falling
/// back to default. A leading `~` is expanded.
pub fn get_log_file_path() -> String {
    let raw = std::env::var_os(LOG_FILE_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    shellexpand::tilde(&raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_names() {
        assert_eq!(LOG_FILE_ENV_VAR, "TYPEWRITER_LOG_FILE");
        assert_eq!(LOG_LEVEL_ENV_VAR, "TYPEWRITER_LOG_LEVEL");
    }

    #[test]
    fn test_get_log_file_path_default_and_override() {
        // Both cases in one test; the env var is process-global
        let original = std::env::var_os(LOG_FILE_ENV_VAR);

        std::env::remove_var(LOG_FILE_ENV_VAR);
        let default_path = get_log_file_path();
        assert!(default_path.ends_with(".typewriter/typewriter.log"));

        let test_path = "/custom/log/typewriter.log";
        std::env::set_var(LOG_FILE_ENV_VAR, test_path);
        assert_eq!(get_log_file_path(), test_path);

        match original {
            Some(val) => std::env::set_var(LOG_FILE_ENV_VAR, val),
            None => std::env::remove_var(LOG_FILE_ENV_VAR),
        }
    }
}
