//! # Platform-specific utilities
//!
//! Questo modulo centralizza la logica per trovare tool esterni opzionali
//! nel `PATH` di sistema. L'unico tool usato è `cjpeg` (mozjpeg) per
//! l'encoding JPEG ad alta efficienza; se manca si usa l'encoder in-process.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Platform-specific command manager
pub struct PlatformCommands {
    executable_suffix: &'static str,
}

impl PlatformCommands {
    /// Get the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<PlatformCommands> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    fn new() -> Self {
        Self {
            executable_suffix: if cfg!(windows) { ".exe" } else { "" },
        }
    }

    /// Get the platform-specific command name
    pub fn get_command(&self, base_name: &str) -> String {
        format!("{}{}", base_name, self.executable_suffix)
    }

    /// Resolve a tool to its full path by scanning `PATH`
    pub fn resolve_tool(&self, base_name: &str) -> Option<PathBuf> {
        let command = self.get_command(base_name);
        let path_var = env::var_os("PATH")?;
        let found = Self::find_in_dirs(env::split_paths(&path_var), &command);

        match &found {
            Some(path) => debug!("Resolved tool {} -> {}", base_name, path.display()),
            None => debug!("Tool not found in PATH: {}", base_name),
        }
        found
    }

    fn find_in_dirs<I>(dirs: I, command: &str) -> Option<PathBuf>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        dirs.into_iter()
            .map(|dir| dir.join(command))
            .find(|candidate| Self::is_executable_file(candidate))
    }

    #[cfg(unix)]
    fn is_executable_file(path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_executable_file(path: &Path) -> bool {
        path.is_file()
    }

    /// Get system information for debugging
    pub fn system_info() -> SystemInfo {
        SystemInfo {
            os: env::consts::OS,
            arch: env::consts::ARCH,
            family: env::consts::FAMILY,
        }
    }
}

/// System information structure
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub family: &'static str,
}

impl std::fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.os, self.arch, self.family)
    }
}

/// Converts an iterable of string-like items to `Vec<String>` for command arguments
pub fn to_string_vec<T, I>(items: I) -> Vec<String>
where
    T: ToString,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_command() {
        let platform = PlatformCommands::instance();
        let cjpeg = platform.get_command("cjpeg");
        assert!(cjpeg.starts_with("cjpeg"));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_in_dirs_requires_executable() {
        use std::os::unix::fs::PermissionsExt;

        let empty = TempDir::new().unwrap();
        let with_tool = TempDir::new().unwrap();
        let tool = with_tool.path().join("cjpeg");
        std::fs::write(&tool, b"#!/bin/sh\n").unwrap();

        let dirs = || vec![empty.path().to_path_buf(), with_tool.path().to_path_buf()];

        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(PlatformCommands::find_in_dirs(dirs(), "cjpeg"), None);

        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(PlatformCommands::find_in_dirs(dirs(), "cjpeg"), Some(tool));
    }

    #[test]
    fn test_unknown_tool_not_available() {
        let platform = PlatformCommands::instance();
        assert!(!platform.resolve_tool("definitely-not-a-real-tool-4821").is_some());
    }

    #[test]
    fn test_system_info() {
        let info = PlatformCommands::system_info();
        assert!(!info.os.is_empty());
        assert!(!info.arch.is_empty());
        assert!(info.to_string().contains(info.os));
    }

    #[test]
    fn test_to_string_vec_mixed_types() {
        let quality = 80;
        let result = to_string_vec(["-quality", &quality.to_string(), "-optimize"]);
        assert_eq!(result, vec!["-quality", "80", "-optimize"]);
    }
}
