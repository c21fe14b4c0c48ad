use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use super::unescape::unescape_html;
use crate::error::Result;
use crate::generator::{Destination, SourceSet};

/// Default output root of directory mode
pub const DEFAULT_OUTPUT_ROOT: &str = "gen_src";

// Directory mode deletes and recreates part of the output tree, so two runs
// must never interleave.
static DIR_LOCK: Mutex<()> = Mutex::new(());

/// Write both artifacts below `root`.
///
/// The `data` subdirectory is removed and recreated first, so files from an
/// earlier run that this run no longer produces do not survive. `root` itself
/// is created when missing and is otherwise left alone. Runs are serialized
/// process-wide.
///
/// Returns the written paths, main first.
pub fn write_to_dir(root: &Path, sources: &SourceSet) -> Result<Vec<PathBuf>> {
    let _guard = DIR_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    fs::create_dir_all(root)?;
    for destination in Destination::ALL {
        if let Some(subdir) = destination.subdir() {
            let dir = root.join(subdir);
            match fs::remove_dir_all(&dir) {
                Ok(()) => debug!(dir = %dir.display(), "removed previous output"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            fs::create_dir_all(&dir)?;
        }
    }

    let mut written = Vec::with_capacity(2);
    for artifact in sources.artifacts() {
        let path = root.join(artifact.relative_path());
        fs::write(&path, unescape_html(&artifact.body).as_bytes())?;
        info!(path = %path.display(), id = %artifact.id, "wrote artifact");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Artifact;

    fn sources(main: &str, data: &str) -> SourceSet {
        SourceSet {
            main: Artifact::new(Destination::Main, main.to_string()),
            data: Artifact::new(Destination::Data, data.to_string()),
        }
    }

    #[test]
    fn test_writes_fixed_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("out");
        let written = write_to_dir(&root, &sources("fn main() {}", "// data")).unwrap();
        assert_eq!(written, vec![root.join("main.rs"), root.join("data/sql.rs")]);
        assert_eq!(fs::read_to_string(root.join("main.rs")).unwrap(), "fn main() {}");
        assert_eq!(fs::read_to_string(root.join("data/sql.rs")).unwrap(), "// data");
    }

    #[test]
    fn test_stale_data_files_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/old.rs"), "stale").unwrap();
        fs::write(dir.path().join("keep.txt"), "mine").unwrap();
        write_to_dir(dir.path(), &sources("", "")).unwrap();
        assert!(!dir.path().join("data/old.rs").exists());
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_bodies_are_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        write_to_dir(dir.path(), &sources("a &lt; b &amp;&amp; &quot;c&quot;", "")).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("main.rs")).unwrap(),
            "a < b && \"c\""
        );
    }
}
