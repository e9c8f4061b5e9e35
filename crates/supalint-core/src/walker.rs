//! Source tree walker

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directories pruned wholly from traversal: their contents are never
/// visited.
const PRUNED_DIRS: &[&str] = &["node_modules", ".git"];

/// Default extensions of the query builder's target language
const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// Enumerates candidate source files under a root directory.
///
/// Walking mutates nothing, so the walker is restartable: `files()` can
/// be called any number of times and yields the same sorted sequence.
#[derive(Debug, Clone)]
pub struct SourceWalker {
    root: PathBuf,
    extensions: Vec<String>,
}

impl SourceWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Override the extension set
    pub fn with_extensions(
        mut self,
        extensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Lazily yield matching files in sorted traversal order
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_pruned(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!(%err, "skipped unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(DirEntry::into_path)
            .filter(move |path| self.matches_extension(path))
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

fn is_pruned(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| PRUNED_DIRS.contains(&name))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    struct TempTree(PathBuf);

    impl TempTree {
        fn new(name: &str) -> Self {
            let root = std::env::temp_dir().join(format!("supalint-{}-{}", name, std::process::id()));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).unwrap();
            Self(root)
        }

        fn write(&self, rel: &str) {
            let path = self.0.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
    }

    impl Drop for TempTree {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_walks_sources_and_prunes_dependency_dirs() {
        let tree = TempTree::new("walk");
        tree.write("src/a.ts");
        tree.write("src/components/b.tsx");
        tree.write("src/styles.css");
        tree.write("node_modules/pkg/index.ts");
        tree.write(".git/config.ts");

        let walker = SourceWalker::new(&tree.0);
        let files: Vec<PathBuf> = walker.files().collect();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(&tree.0).unwrap().display().to_string())
            .collect();

        assert_eq!(names, vec!["src/a.ts", "src/components/b.tsx"]);
    }

    #[test]
    fn test_restartable() {
        let tree = TempTree::new("restart");
        tree.write("a.ts");
        tree.write("b.tsx");

        let walker = SourceWalker::new(&tree.0);
        let first: Vec<PathBuf> = walker.files().collect();
        let second: Vec<PathBuf> = walker.files().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_custom_extensions() {
        let tree = TempTree::new("ext");
        tree.write("a.ts");
        tree.write("b.js");

        let walker = SourceWalker::new(&tree.0).with_extensions(["js"]);
        let files: Vec<PathBuf> = walker.files().collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("b.js"));
    }
}
