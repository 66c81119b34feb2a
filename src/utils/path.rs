//! Filename helpers shared by parser and thumbnail dispatch

use std::path::Path;

/// Filename helpers
pub struct PathUtils;

impl PathUtils {
    /// Final path segment, split on the platform's separators only.
    ///
    /// A backslash is an ordinary character on Unix, so `a\b.png` stays whole there.
    pub fn basename(name: &str) -> &str {
        name.rsplit(std::path::is_separator).next().unwrap_or(name)
    }

    /// Split a basename into `(root, ext)`; `ext` keeps its leading dot.
    ///
    /// Leading dots never start an extension, so `.bashrc` has none and
    /// `archive.tar.gz` splits into `archive.tar` and `.gz`.
    pub fn split_ext(name: &str) -> (&str, &str) {
        let base = Self::basename(name);
        let prefix_len = name.len() - base.len();
        let skip = base.len() - base.trim_start_matches('.').len();
        match base[skip..].rfind('.') {
            Some(dot) => {
                let at = prefix_len + skip + dot;
                (&name[..at], &name[at..])
            }
            None => (name, ""),
        }
    }

    /// Extension of the basename with its leading dot, case preserved
    pub fn extension(name: &str) -> &str {
        Self::split_ext(Self::basename(name)).1
    }

    /// Basename without its extension
    pub fn stem(name: &str) -> &str {
        Self::split_ext(Self::basename(name)).0
    }

    /// Lossy string form of a path
    pub fn display(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }
}
