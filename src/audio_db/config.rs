/*!
 * Audio sources configuration.
 *
 * A JSON document listing the audio sources to index:
 *
 * ```json
 * { "sources": [ { "id": "forvo", "path": "forvo_files", "kind": "forvo" } ] }
 * ```
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{InitOptions, PathResolver};
use crate::errors::InitError;
use crate::file_utils::FileManager;

/// Layout of an audio source directory
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `<speaker>/<expression>.<ext>`
    Forvo,
    /// `<reading> - <expression>.<ext>`
    Jpod,
    /// `index.json` mapping headwords to files
    Index,
}

/// One audio source
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SourceConfig {
    /// Value stored in the `source` column
    pub id: String,
    /// Directory, relative to the data dir unless absolute
    pub path: String,
    /// Directory layout
    pub kind: SourceKind,
}

impl SourceConfig {
    pub fn new(id: &str, kind: SourceKind) -> Self {
        Self {
            id: id.to_string(),
            path: format!("{}_files", id),
            kind,
        }
    }
}

/// Sources to index, in insertion order
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AudioSourcesConfig {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl Default for AudioSourcesConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceConfig::new("nhk16", SourceKind::Index),
                SourceConfig::new("shinmeikai8", SourceKind::Index),
                SourceConfig::new("forvo", SourceKind::Forvo),
                SourceConfig::new("jpod", SourceKind::Jpod),
            ],
        }
    }
}

impl AudioSourcesConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self, InitError> {
        let to_config_error = |message: String| InitError::Config {
            path: path.display().to_string(),
            message,
        };

        let file = File::open(path).map_err(|e| to_config_error(e.to_string()))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| to_config_error(e.to_string()))
    }
}

/// Pick the sources config: user file, then default file, then built-ins in standalone mode
pub fn resolve_config<R: PathResolver + ?Sized>(
    resolver: &R,
    options: &InitOptions,
) -> Result<AudioSourcesConfig, InitError> {
    let candidates = [resolver.config_file(), resolver.default_config_file()];
    if let Some(path) = candidates.iter().find(|p| FileManager::file_exists(p)) {
        info!("Using audio sources config: {:?}", path);
        return AudioSourcesConfig::load(path);
    }

    if options.standalone {
        debug!("No sources config found, using built-in sources");
        Ok(AudioSourcesConfig::default())
    } else {
        Err(InitError::HostConfigMissing(
            candidates[0].display().to_string(),
        ))
    }
}
