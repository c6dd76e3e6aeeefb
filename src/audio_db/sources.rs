use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use walkdir::WalkDir;

use super::config::{SourceConfig, SourceKind};
use crate::errors::InitError;
use crate::file_utils::FileManager;

/// Extensions recognized as audio clips
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "opus", "m4a", "aac", "wav", "flac"];

/// Index file name for `SourceKind::Index` sources
pub const INDEX_FILENAME: &str = "index.json";

// `<reading> - <expression>.<ext>`
static JPOD_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<reading>.+?) - (?P<expression>.+)\.[^.]+$").unwrap());

/// One row of the `entries` table
#[derive(Debug, Clone, PartialEq)]
pub struct AudioEntry {
    pub expression: String,
    pub reading: Option<String>,
    pub source: String,
    pub speaker: Option<String>,
    pub display: Option<String>,
    /// Path relative to the source directory, `/`-separated
    pub file: String,
}

#[derive(Debug, Deserialize)]
struct IndexFile {
    #[serde(default)]
    headwords: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    files: BTreeMap<String, IndexFileInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct IndexFileInfo {
    #[serde(default)]
    kana_reading: Option<String>,
    #[serde(default)]
    pitch_pattern: Option<String>,
    #[serde(default)]
    pitch_number: Option<String>,
}

/// Collect the entries of one source directory
pub fn scan_source(source: &SourceConfig, dir: &Path) -> Result<Vec<AudioEntry>, InitError> {
    let entries = match source.kind {
        SourceKind::Forvo => scan_forvo(&source.id, dir)?,
        SourceKind::Jpod => scan_jpod(&source.id, dir)?,
        SourceKind::Index => scan_index(&source.id, dir)?,
    };
    debug!("Scanned {} entries from {:?}", entries.len(), dir);
    Ok(entries)
}

// @checks: Audio file extension
fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            AUDIO_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a))
        })
        .unwrap_or(false)
}

// @returns: Audio files directly inside `dir`, sorted by name
fn audio_files(dir: &Path) -> Result<Vec<walkdir::DirEntry>, InitError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_audio_file(entry.path()) {
            files.push(entry);
        }
    }
    Ok(files)
}

fn scan_forvo(source_id: &str, dir: &Path) -> Result<Vec<AudioEntry>, InitError> {
    let mut entries = Vec::new();
    for speaker_dir in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let speaker_dir = speaker_dir.map_err(std::io::Error::from)?;
        if !speaker_dir.file_type().is_dir() {
            continue;
        }

        let speaker = speaker_dir.file_name().to_string_lossy().to_string();
        for file in audio_files(speaker_dir.path())? {
            let Some(expression) = file.path().file_stem() else {
                continue;
            };
            let file_name = file.file_name().to_string_lossy();
            entries.push(AudioEntry {
                expression: expression.to_string_lossy().to_string(),
                reading: None,
                source: source_id.to_string(),
                speaker: Some(speaker.clone()),
                display: Some(speaker.clone()),
                file: format!("{}/{}", speaker, file_name),
            });
        }
    }
    Ok(entries)
}

fn scan_jpod(source_id: &str, dir: &Path) -> Result<Vec<AudioEntry>, InitError> {
    let mut entries = Vec::new();
    for file in audio_files(dir)? {
        let file_name = file.file_name().to_string_lossy().to_string();
        let Some(captures) = JPOD_FILENAME.captures(&file_name) else {
            warn!("Skipping jpod file with unexpected name: {}", file_name);
            continue;
        };

        entries.push(AudioEntry {
            expression: captures["expression"].to_string(),
            reading: Some(captures["reading"].to_string()),
            source: source_id.to_string(),
            speaker: None,
            display: None,
            file: file_name,
        });
    }
    Ok(entries)
}

fn scan_index(source_id: &str, dir: &Path) -> Result<Vec<AudioEntry>, InitError> {
    let index_path = dir.join(INDEX_FILENAME);
    if !FileManager::file_exists(&index_path) {
        warn!("Source {} has no {}, skipping", source_id, INDEX_FILENAME);
        return Ok(Vec::new());
    }

    let file = File::open(&index_path)?;
    let index: IndexFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| InitError::Config {
            path: index_path.display().to_string(),
            message: e.to_string(),
        })?;

    let mut entries = Vec::new();
    for (expression, files) in &index.headwords {
        for file in files {
            let info = index.files.get(file);
            entries.push(AudioEntry {
                expression: expression.clone(),
                reading: info.and_then(|i| i.kana_reading.clone()),
                source: source_id.to_string(),
                speaker: None,
                display: info.and_then(|i| i.pitch_pattern.clone().or_else(|| i.pitch_number.clone())),
                file: file.clone(),
            });
        }
    }
    Ok(entries)
}
