/*!
 * Local audio database initialization.
 *
 * Builds the SQLite `entries` table that a local audio server reads to
 * answer "which clips exist for this word" lookups. Every location the
 * initializer touches comes from a `PathResolver` and every behavioral
 * switch from `InitOptions`, so callers can point it anywhere without
 * touching shared state.
 */

use log::{debug, info};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::InitError;
use crate::file_utils::FileManager;

pub mod config;
pub mod paths;
pub mod schema;
pub mod sources;

pub use config::{AudioSourcesConfig, SourceConfig, SourceKind};
pub use paths::{BootstrapPaths, DefaultPaths};
pub use sources::AudioEntry;

/// Capability that tells the initializer where everything lives
pub trait PathResolver {
    /// Directory containing one subdirectory per audio source
    fn data_dir(&self) -> PathBuf;

    /// SQLite database file to create
    fn db_file(&self) -> PathBuf;

    /// File recording which schema version built the database
    fn version_file(&self) -> PathBuf;

    /// User sources config, consulted first
    fn config_file(&self) -> PathBuf;

    /// Fallback sources config
    fn default_config_file(&self) -> PathBuf;
}

/// Behavioral switches for `init_database`
#[derive(Debug, Clone, PartialEq)]
pub struct InitOptions {
    /// Run without the host application: a missing config falls back to
    /// the built-in sources instead of failing
    pub standalone: bool,
    /// Write the schema version to `version_file()` after a successful build
    pub write_version_file: bool,
}

impl InitOptions {
    /// Options for running outside the host, leaving the version file alone
    pub fn standalone() -> Self {
        Self {
            standalone: true,
            write_version_file: false,
        }
    }
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            standalone: false,
            write_version_file: true,
        }
    }
}

/// What an initialization run produced
#[derive(Debug, Clone, PartialEq)]
pub struct InitSummary {
    /// Database that was written
    pub db_file: PathBuf,
    /// (source id, rows inserted) for every source that was scanned
    pub entries_per_source: Vec<(String, usize)>,
}

impl InitSummary {
    /// Total number of rows inserted
    pub fn total_entries(&self) -> usize {
        self.entries_per_source.iter().map(|(_, n)| n).sum()
    }
}

/// Create (or rebuild) the audio database at `resolver.db_file()`
pub fn init_database<R: PathResolver + ?Sized>(
    resolver: &R,
    options: &InitOptions,
) -> Result<InitSummary, InitError> {
    let data_dir = resolver.data_dir();
    if !FileManager::dir_exists(&data_dir) {
        return Err(InitError::DataDir(data_dir.display().to_string()));
    }

    let sources_config = config::resolve_config(resolver, options)?;

    let db_file = resolver.db_file();
    FileManager::ensure_parent_dir(&db_file)?;

    info!("Opening audio database at: {:?}", db_file);
    let mut conn = Connection::open(&db_file)?;
    schema::recreate_entries_table(&conn)?;

    let mut entries_per_source = Vec::new();
    for source in &sources_config.sources {
        let source_dir = resolve_source_dir(&data_dir, &source.path);
        if !FileManager::dir_exists(&source_dir) {
            debug!("Skipping source {}: {:?} is not a directory", source.id, source_dir);
            continue;
        }

        let entries = sources::scan_source(source, &source_dir)?;
        let inserted = schema::insert_entries(&mut conn, &entries)?;
        info!("Source {}: {} entries", source.id, inserted);
        entries_per_source.push((source.id.clone(), inserted));
    }

    if options.write_version_file {
        let version_file = resolver.version_file();
        FileManager::ensure_parent_dir(&version_file)?;
        fs::write(&version_file, schema::SCHEMA_VERSION.to_string())?;
        debug!("Wrote version file: {:?}", version_file);
    }

    Ok(InitSummary {
        db_file,
        entries_per_source,
    })
}

// @returns: Source directory; relative paths hang off the data dir
fn resolve_source_dir(data_dir: &Path, source_path: &str) -> PathBuf {
    let path = Path::new(source_path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}
