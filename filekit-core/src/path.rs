pub const SEPARATOR: char = '/';

/// Appends `component` to `base`, inserting a separator only when `base`
/// does not already end with one.
pub fn join(base: &str, component: &str) -> String {
    if base.ends_with(SEPARATOR) {
        format!("{}{}", base, component)
    } else {
        format!("{}{}{}", base, SEPARATOR, component)
    }
}

/// Returns `path` with exactly one trailing separator.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches(SEPARATOR);
    format!("{}{}", trimmed, SEPARATOR)
}

/// Last component of a directory path, ignoring the trailing separator.
pub fn last_component(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    match trimmed.rfind(SEPARATOR) {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

/// Substring after the final `.` of `name`, or `None` when there is no dot
/// or the name ends with one.
pub fn extension_of(name: &str) -> Option<&str> {
    let index = name.rfind('.')?;
    let ext = &name[index + 1..];
    if ext.is_empty() { None } else { Some(ext) }
}

pub fn matches_extension(name: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(ext) => extension_of(name) == Some(ext),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_inserts_single_separator() {
        assert_eq!(join("/tmp/x", "a.txt"), "/tmp/x/a.txt");
        assert_eq!(join("/tmp/x/", "a.txt"), "/tmp/x/a.txt");
    }

    #[test]
    fn test_join_keeps_component_separators() {
        assert_eq!(join("/tmp/x/", "/a"), "/tmp/x//a");
        assert_eq!(join("/tmp", "sub/"), "/tmp/sub/");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/tmp/test"), "/tmp/test/");
        assert_eq!(normalize("/tmp/test/"), "/tmp/test/");
        assert_eq!(normalize("/tmp/test//"), "/tmp/test/");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn test_last_component() {
        assert_eq!(last_component("/tmp/myFolder/"), "myFolder");
        assert_eq!(last_component("/tmp/myFolder"), "myFolder");
        assert_eq!(last_component("relative"), "relative");
        assert_eq!(last_component("/"), "");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("archive.zip"), Some("zip"));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz"));
        assert_eq!(extension_of("folder"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of(".bashrc"), Some("bashrc"));
    }

    #[test]
    fn test_matches_extension_is_case_sensitive() {
        assert!(matches_extension("a.txt", Some("txt")));
        assert!(!matches_extension("a.TXT", Some("txt")));
        assert!(matches_extension("Makefile", None));
        assert!(!matches_extension("Makefile", Some("")));
    }
}
