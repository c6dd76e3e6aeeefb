use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

/// File operations utility
pub struct FileManager;

impl FileManager {
    /// Whether `path` exists and is a regular file
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    /// Whether `path` exists and is a directory
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    /// Create a directory and its parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !Self::dir_exists(path) {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Create the directory that will hold `path`, if it has one
    pub fn ensure_parent_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        match path.as_ref().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Self::ensure_dir(parent),
            _ => Ok(()),
        }
    }

    /// Insert a release tag before the extension of a file name.
    ///
    /// Only the last extension counts, and a leading dot does not start one:
    /// `JMdict_english.zip` becomes `JMdict_english_v1.2.zip`, `a.tar.gz`
    /// becomes `a.tar_v1.gz` and `.hidden` becomes `.hidden_v1`. Path
    /// separators in the tag become underscores so the result stays a
    /// single path component.
    pub fn tagged_filename(filename: &str, tag: &str) -> String {
        let (base, ext) = split_extension(filename);
        let tag = tag.replace(['/', '\\'], "_");
        format!("{}_{}{}", base, tag, ext)
    }

    /// Sibling path used while a download is in flight
    pub fn partial_download_path<P: AsRef<Path>>(target: P) -> PathBuf {
        let target = target.as_ref();
        let mut name = target
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(OsString::new);
        name.push(".part");
        target.with_file_name(name)
    }
}

// @returns: (base, ext) where ext keeps its leading dot or is empty
fn split_extension(filename: &str) -> (&str, &str) {
    let stem_start = filename.len() - filename.trim_start_matches('.').len();
    match filename[stem_start..].rfind('.') {
        Some(idx) => filename.split_at(stem_start + idx),
        None => (filename, ""),
    }
}
