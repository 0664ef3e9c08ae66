//! Scratch workspace for acquisition attempts
//!
//! Each acquisition call gets one scratch directory that is wiped between
//! format candidates and removed when the workspace drops — including on
//! timeout and cancellation. A successful artifact is promoted into its own
//! directory *before* the scratch space goes away, so cleanup can never
//! destroy the result.
//!
//! Directory scans and copies are blocking fs work and run on the blocking
//! pool.

use super::types::Artifact;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory for one acquisition call.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh scratch directory.
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("mediagate-").tempdir()?;
        Ok(Self { dir })
    }

    /// Path providers should write into.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove any partial output left by a previous candidate.
    pub async fn clear(&self) -> io::Result<()> {
        let root = self.dir.path().to_path_buf();
        run_blocking(move || {
            for entry in std::fs::read_dir(&root)? {
                let entry = entry?;
                let path = entry.path();
                if entry.file_type()?.is_dir() {
                    std::fs::remove_dir_all(&path)?;
                } else {
                    std::fs::remove_file(&path)?;
                }
            }
            Ok(())
        })
        .await
    }

    /// Locate the most-recently-modified file in the workspace, with its
    /// size. `None` when the provider produced nothing.
    pub async fn newest_file(&self) -> io::Result<Option<(PathBuf, u64)>> {
        let root = self.dir.path().to_path_buf();
        run_blocking(move || {
            let mut newest: Option<(PathBuf, u64, std::time::SystemTime)> = None;
            scan_newest(&root, &mut newest)?;
            Ok(newest.map(|(path, size, _)| (path, size)))
        })
        .await
    }

    /// Copy `src` into a caller-owned delivery directory and return the
    /// resulting artifact. The workspace itself stays intact until dropped.
    pub async fn promote(&self, src: &Path) -> io::Result<Artifact> {
        let src = src.to_path_buf();
        run_blocking(move || {
            let delivery = tempfile::Builder::new().prefix("mediagate-out-").tempdir()?;
            let file_name = src
                .file_name()
                .ok_or_else(|| io::Error::other("artifact path has no file name"))?;
            let dest = delivery.path().join(file_name);
            std::fs::copy(&src, &dest)?;
            let size = std::fs::metadata(&dest)?.len();
            Ok(Artifact::new(delivery, dest, size))
        })
        .await
    }
}

fn scan_newest(
    dir: &Path,
    newest: &mut Option<(PathBuf, u64, std::time::SystemTime)>,
) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            scan_newest(&path, newest)?;
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = meta.modified() else {
            continue;
        };
        let replace = match newest {
            Some((_, _, current)) => modified > *current,
            None => true,
        };
        if replace {
            *newest = Some((path, meta.len(), modified));
        }
    }
    Ok(())
}

async fn run_blocking<T, F>(f: F) -> io::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| io::Error::other(format!("blocking fs task failed: {e}")))?
}
