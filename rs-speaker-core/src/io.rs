use std::fs::File;
use std::io::Read;
use std::ffi::OsStr;
use std::path::Path;
use std::{fs, io};

/// Reads a text file and returns its content on a single line.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n` and joins the lines with one space
pub fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().collect::<Vec<_>>().join(" "))
}

/// Names of the speakers stored in `dir`.
///
/// A speaker is a file with the given extension, named by its file stem
/// (`./data/hamilton.txt` is speaker `hamilton`). Sub-directories are
/// skipped. Names are sorted.
pub fn list_speakers<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut names = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			if let Some(stem) = path.file_stem() {
				names.push(stem.to_string_lossy().into_owned());
			}
		}
	}

	names.sort();
	Ok(names)
}
