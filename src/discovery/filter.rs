use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub type PathPredicate = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Cheap, name-only test applied before any file content is read.
#[derive(Clone)]
pub enum FileFilter {
    Any,
    /// Lowercased extensions without the leading dot.
    Extensions(BTreeSet<String>),
    Predicate {
        label: String,
        predicate: PathPredicate,
    },
}

impl FileFilter {
    /// Accepts `"java"`, `".java"` or `".JAVA"` alike.
    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Extensions(
            extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .filter(|ext| !ext.is_empty())
                .collect(),
        )
    }

    pub fn predicate<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        Self::Predicate {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Self::Any => true,
            Self::Extensions(allowed) => {
                file_extension(path).is_some_and(|ext| allowed.contains(&ext))
            }
            Self::Predicate { predicate, .. } => predicate(path),
        }
    }

    /// Human-readable form used in error messages, e.g. `.java` or `.js/.ts`.
    pub fn describe(&self) -> String {
        match self {
            Self::Any => "matching".to_string(),
            Self::Extensions(allowed) if allowed.is_empty() => "matching".to_string(),
            Self::Extensions(allowed) => allowed
                .iter()
                .map(|ext| format!(".{ext}"))
                .collect::<Vec<_>>()
                .join("/"),
            Self::Predicate { label, .. } => label.clone(),
        }
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::Any
    }
}

impl fmt::Debug for FileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::Extensions(allowed) => f.debug_tuple("Extensions").field(allowed).finish(),
            Self::Predicate { label, .. } => f.debug_struct("Predicate").field("label", label).finish(),
        }
    }
}

/// Lowercased extension of `path` without the dot.
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions_ignore_leading_dot_and_case() {
        let filter = FileFilter::extensions([".java", "JSP"]);
        assert!(filter.matches(Path::new("/src/Foo.java")));
        assert!(filter.matches(Path::new("/src/Foo.JAVA")));
        assert!(filter.matches(Path::new("/web/index.jsp")));
        assert!(!filter.matches(Path::new("/src/Foo.class")));
        assert!(!filter.matches(Path::new("/src/Makefile")));
    }

    #[test]
    fn test_predicate_filter() {
        let filter = FileFilter::predicate("test sources", |p: &Path| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("Test.java"))
        });
        assert!(filter.matches(Path::new("FooTest.java")));
        assert!(!filter.matches(Path::new("Foo.java")));
        assert_eq!(filter.describe(), "test sources");
    }

    #[test]
    fn test_describe_extensions() {
        assert_eq!(FileFilter::extensions(["ts", ".js"]).describe(), ".js/.ts");
        assert_eq!(FileFilter::Any.describe(), "matching");
    }
}
