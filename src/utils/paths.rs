use std::path::Path;

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use adrian::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/home/alice/cases/1234");
/// // Returns "~/cases/1234" if HOME=/home/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, dirs::home_dir().as_deref())
}

/// Internal helper for path formatting with an explicit home (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home: Option<&Path>) -> String {
    // A home of "/" or "" would put every absolute path under "~"
    let home = home.filter(|home| home.parent().is_some());

    match home.and_then(|home| path.strip_prefix(home).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_format_path_with_tilde() {
        let path = PathBuf::from("/home/testuser/cases/1234");
        let home = Path::new("/home/testuser");
        let formatted = format_path_with_tilde_internal(&path, Some(home));
        assert_eq!(formatted, "~/cases/1234");

        // Path not under home
        let path2 = PathBuf::from("/srv/cases");
        let formatted2 = format_path_with_tilde_internal(&path2, Some(home));
        assert_eq!(formatted2, "/srv/cases");

        assert_eq!(format_path_with_tilde_internal(home, Some(home)), "~");
        assert_eq!(format_path_with_tilde_internal(&path2, None), "/srv/cases");
    }

    #[test]
    fn test_format_path_with_tilde_requires_component_boundary() {
        // "/home/test" is a string prefix of "/home/testuser" but not a parent directory
        let path = PathBuf::from("/home/testuser/cases");
        let formatted = format_path_with_tilde_internal(&path, Some(Path::new("/home/test")));
        assert_eq!(formatted, "/home/testuser/cases");
    }

    #[test]
    fn test_root_home_is_not_abbreviated() {
        let path = PathBuf::from("/root/cases");
        assert_eq!(format_path_with_tilde_internal(&path, Some(Path::new("/"))), "/root/cases");
        assert_eq!(format_path_with_tilde_internal(&path, Some(Path::new(""))), "/root/cases");
    }
}
