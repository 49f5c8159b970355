use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Invalid UTF-8 sequences are replaced by U+FFFD instead of failing
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_lines_lossy<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let path = filename.as_ref();
	let bytes = fs::read(path)?;
	let contents = String::from_utf8_lossy(&bytes);
	if let Cow::Owned(_) = contents {
		log::warn!("{}: invalid UTF-8 replaced with placeholder characters", path.display());
	}
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Writes `bytes` to `path`, creating the parent directory if needed.
pub(crate) fn write_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> io::Result<()> {
	let path = path.as_ref();
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)?;
		}
	}
	fs::write(path, bytes)
}
