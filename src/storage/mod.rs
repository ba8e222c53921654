//! # File Formats
//!
//! Vector store and coordinate files, plus the optional reduction report.
//! Writers stage their output in a temporary file next to the destination and
//! rename it into place only once every row has been flushed.

pub mod coords;
pub mod report;
pub mod vectors;

pub use report::ReductionReport;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{PipelineError, Result};

/// A fully written temporary file waiting to be renamed over its destination.
///
/// Dropping it without calling [`Staged::commit`] removes the temporary file
/// and leaves the destination untouched.
pub(crate) struct Staged {
	tmp: NamedTempFile,
	path: PathBuf,
}

impl Staged {
	pub(crate) fn path(&self) -> &Path {
		&self.path
	}

	/// Rename the staged file into place.
	pub(crate) fn commit(self) -> Result<()> {
		let Staged { tmp, path } = self;
		tmp.persist(&path).map_err(|e| PipelineError::io(&path, e.error))?;
		Ok(())
	}
}

/// Write `path`'s content into a temporary sibling file without publishing it.
pub(crate) fn stage<F>(path: &Path, write_body: F) -> Result<Staged>
where
	F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
	let dir = match path.parent() {
		Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
		_ => PathBuf::from("."),
	};
	fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;

	let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| PipelineError::io(&dir, e))?;
	{
		let mut writer = BufWriter::new(tmp.as_file_mut());
		write_body(&mut writer).map_err(|e| PipelineError::io(path, e))?;
		writer.flush().map_err(|e| PipelineError::io(path, e))?;
	}
	tmp.as_file().sync_all().map_err(|e| PipelineError::io(path, e))?;

	Ok(Staged {
		tmp,
		path: path.to_path_buf(),
	})
}

/// Write `path` through a temporary sibling file, then persist it atomically.
pub(crate) fn write_atomic<F>(path: &Path, write_body: F) -> Result<()>
where
	F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
	stage(path, write_body)?.commit()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;

	#[test]
	fn creates_missing_parent_directories() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("a/b/out.txt");
		write_atomic(&path, |w| w.write_all(b"hello")).unwrap();
		assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
	}

	#[test]
	fn failed_body_leaves_no_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("out.txt");
		let err = write_atomic(&path, |w| {
			w.write_all(b"partial")?;
			Err(io::Error::other("boom"))
		})
		.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Io);
		assert!(!path.exists());
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
	}

	#[test]
	fn unwritable_destination_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let blocker = dir.path().join("blocker");
		fs::write(&blocker, "file, not a directory").unwrap();
		let err = write_atomic(&blocker.join("out.txt"), |w| w.write_all(b"x")).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Io);
	}

	#[test]
	fn dropped_stage_leaves_destination_alone() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("out.txt");
		fs::write(&path, "previous").unwrap();

		let staged = stage(&path, |w| w.write_all(b"next")).unwrap();
		assert_eq!(staged.path(), path.as_path());
		drop(staged);

		assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

		stage(&path, |w| w.write_all(b"next")).unwrap().commit().unwrap();
		assert_eq!(fs::read_to_string(&path).unwrap(), "next");
	}
}
