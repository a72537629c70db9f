//! Where POD documents come from.
//!
//! A [`DocumentSource`] answers "give me the raw text for this id", with
//! `Ok(None)` meaning the document does not exist. Ids are either module
//! names (`Foo::Bar`) or relative file names (`perlpod.pod`). Perl source
//! files are reduced to their POD regions.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use podlens_shared::{PodlensError, Result, SourceConfig};

/// One `::`-separated module name segment.
static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// Supplies raw document text by id.
pub trait DocumentSource {
    fn fetch(&self, id: &str) -> Result<Option<String>>;
}

// ---------------------------------------------------------------------------
// Filesystem source
// ---------------------------------------------------------------------------

/// Looks documents up under a list of root directories.
#[derive(Debug, Clone)]
pub struct FsSource {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl FsSource {
    pub fn new(roots: Vec<PathBuf>, extensions: Vec<String>) -> Self {
        Self { roots, extensions }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(
            config.roots.iter().map(PathBuf::from).collect(),
            config.extensions.clone(),
        )
    }

    /// Relative paths to try, in order, for `id`.
    fn candidates(&self, id: &str) -> Result<Vec<PathBuf>> {
        let id = id.trim();
        if id.is_empty() {
            return Err(PodlensError::validation("document id is empty"));
        }

        let has_known_extension = Path::new(id)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext));

        if has_known_extension && !id.contains("::") {
            let path = PathBuf::from(id);
            let escapes = path
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if escapes {
                return Err(PodlensError::validation(format!(
                    "document path `{id}` must stay inside the source roots"
                )));
            }
            return Ok(vec![path]);
        }

        let segments: Vec<&str> = id.split("::").collect();
        if let Some(bad) = segments.iter().find(|s| !SEGMENT_RE.is_match(s)) {
            return Err(PodlensError::validation(format!(
                "invalid module name `{id}` (bad segment `{bad}`)"
            )));
        }
        let base: PathBuf = segments.iter().collect();

        Ok(self
            .extensions
            .iter()
            .map(|ext| base.with_extension(ext))
            .collect())
    }
}

impl DocumentSource for FsSource {
    #[instrument(skip(self))]
    fn fetch(&self, id: &str) -> Result<Option<String>> {
        let candidates = self.candidates(id)?;

        for root in &self.roots {
            if root.is_file() {
                return Err(PodlensError::Source(format!(
                    "source root {} is a file, not a directory",
                    root.display()
                )));
            }
            for relative in &candidates {
                let path = root.join(relative);
                match std::fs::read(&path) {
                    Ok(bytes) => {
                        debug!(path = %path.display(), bytes = bytes.len(), "document found");
                        let text = String::from_utf8_lossy(&bytes);
                        if podlens_pod::is_perl_source(&path) {
                            return Ok(Some(podlens_pod::pod_regions(&text)));
                        }
                        return Ok(Some(text.into_owned()));
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                    Err(e) => return Err(PodlensError::io(path, e)),
                }
            }
        }

        debug!(roots = self.roots.len(), "document not found");
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

/// A fixed set of documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, markup: impl Into<String>) {
        self.documents.insert(id.into(), markup.into());
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, id: &str) -> Result<Option<String>> {
        Ok(self.documents.get(id.trim()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_in(dir: &Path) -> FsSource {
        FsSource::new(vec![dir.to_path_buf()], vec!["pod".into(), "pm".into()])
    }

    #[test]
    fn module_name_maps_to_nested_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("Foo")).unwrap();
        std::fs::write(dir.path().join("Foo/Bar.pm"), "=head1 NAME\n\nFoo::Bar\n").unwrap();

        let doc = source_in(dir.path()).fetch("Foo::Bar").unwrap();
        assert!(doc.unwrap().contains("Foo::Bar"));
    }

    #[test]
    fn module_code_is_not_returned() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("Counter.pm"),
            "package Counter;\nuse strict;\n\n=head1 NAME\n\nCounter\n\n=cut\n\nsub new { bless {}, shift }\n1;\n",
        )
        .unwrap();

        let doc = source_in(dir.path()).fetch("Counter").unwrap().unwrap();
        assert_eq!(doc, "=head1 NAME\n\nCounter\n\n=cut");
    }

    #[test]
    fn pod_preferred_over_pm() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("Thing.pm"), "from pm").unwrap();
        std::fs::write(dir.path().join("Thing.pod"), "from pod").unwrap();

        let doc = source_in(dir.path()).fetch("Thing").unwrap();
        assert_eq!(doc.as_deref(), Some("from pod"));
    }

    #[test]
    fn earlier_root_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(first.path().join("A.pod"), "first").unwrap();
        std::fs::write(second.path().join("A.pod"), "second").unwrap();

        let source = FsSource::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            vec!["pod".into()],
        );
        assert_eq!(source.fetch("A").unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn file_name_id_is_read_directly() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("perlpod.pod"), "=pod").unwrap();
        let doc = source_in(dir.path()).fetch("perlpod.pod").unwrap();
        assert_eq!(doc.as_deref(), Some("=pod"));
    }

    #[test]
    fn file_as_root_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("not-a-dir.pod");
        std::fs::write(&root, "=pod").unwrap();

        let err = FsSource::new(vec![root], vec!["pod".into()])
            .fetch("Anything")
            .unwrap_err();
        assert!(matches!(err, PodlensError::Source(_)));
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn missing_root_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.pod"), "found").unwrap();
        let source = FsSource::new(
            vec![dir.path().join("absent"), dir.path().to_path_buf()],
            vec!["pod".into()],
        );
        assert_eq!(source.fetch("A").unwrap().as_deref(), Some("found"));
    }

    #[test]
    fn missing_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(source_in(dir.path()).fetch("No::Such").unwrap(), None);
    }

    #[test]
    fn invalid_bytes_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Bin.pod"), b"caf\xe9").unwrap();
        let doc = source_in(dir.path()).fetch("Bin").unwrap().unwrap();
        assert!(doc.starts_with("caf"));
    }

    #[test]
    fn traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path());
        for id in ["../secret.pod", "/etc/passwd.pod", "Foo::..::Bar", "Foo::", "", "a/b"] {
            let err = source.fetch(id).unwrap_err();
            assert!(matches!(err, PodlensError::Validation { .. }), "id {id:?}");
        }
    }

    #[test]
    fn memory_source_lookup() {
        let mut source = MemorySource::new();
        source.insert("DBI", "=head1 NAME");
        assert_eq!(source.fetch("DBI").unwrap().as_deref(), Some("=head1 NAME"));
        assert_eq!(source.fetch("DBD::Pg").unwrap(), None);
    }
}
