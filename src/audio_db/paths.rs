use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use super::PathResolver;

/// Directory name of the audio add-on under the user's data directory
const DEFAULT_BASE_DIRNAME: &str = "local-audio";

/// Name of the version file written next to the database
const VERSION_FILENAME: &str = "version.txt";

/// Locations supplied on the bootstrap command line
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapPaths {
    audio_files: PathBuf,
    db_output: PathBuf,
    config: Option<PathBuf>,
}

impl BootstrapPaths {
    pub fn new<P1: AsRef<Path>, P2: AsRef<Path>>(
        audio_files: P1,
        db_output: P2,
        config: Option<&Path>,
    ) -> Self {
        Self {
            audio_files: audio_files.as_ref().to_path_buf(),
            db_output: db_output.as_ref().to_path_buf(),
            config: config.map(Path::to_path_buf),
        }
    }

    /// Config path handed out when the caller supplied none.
    ///
    /// A child of a device file can never exist, so the initializer always
    /// falls back to its built-in sources.
    pub fn missing_config_path() -> PathBuf {
        if cfg!(windows) {
            PathBuf::from(r"NUL\config.json")
        } else {
            PathBuf::from("/dev/null/config.json")
        }
    }

    fn config_or_missing(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(Self::missing_config_path)
    }
}

impl PathResolver for BootstrapPaths {
    fn data_dir(&self) -> PathBuf {
        self.audio_files.clone()
    }

    fn db_file(&self) -> PathBuf {
        self.db_output.clone()
    }

    fn version_file(&self) -> PathBuf {
        self.db_output.with_file_name(VERSION_FILENAME)
    }

    fn config_file(&self) -> PathBuf {
        self.config_or_missing()
    }

    fn default_config_file(&self) -> PathBuf {
        self.config_or_missing()
    }
}

/// Locations used when running inside the host application
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultPaths {
    base_dir: PathBuf,
}

impl DefaultPaths {
    /// Resolve the add-on directory under the system data directory
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(Self::with_base_dir(data_dir.join(DEFAULT_BASE_DIRNAME)))
    }

    /// Use an explicit add-on directory
    pub fn with_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }
}

impl PathResolver for DefaultPaths {
    fn data_dir(&self) -> PathBuf {
        self.base_dir.join("user_files")
    }

    fn db_file(&self) -> PathBuf {
        self.data_dir().join("entries.db")
    }

    fn version_file(&self) -> PathBuf {
        self.base_dir.join(VERSION_FILENAME)
    }

    fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    fn default_config_file(&self) -> PathBuf {
        self.base_dir.join("default_config.json")
    }
}
