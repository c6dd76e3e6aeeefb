/*!
 * Audio database bootstrapper.
 *
 * Initializes the local audio database at caller-chosen locations without
 * the host application. Failures are reported and folded into a boolean;
 * nothing escapes `bootstrap`.
 */

use clap::error::ErrorKind;
use clap::Parser;
use log::{debug, error, info, LevelFilter};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::audio_db::{self, BootstrapPaths, InitOptions, PathResolver};
use crate::errors::AppError;

/// Printed to stdout when required arguments are missing
pub const USAGE: &str =
    "Usage: audio_db_bootstrap <audio_files_path> <db_output_path> [config_path]";

/// Bootstrap the local audio SQLite database
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "audio_db_bootstrap")]
#[command(version)]
#[command(about = "Bootstrap the local audio SQLite database at custom locations")]
pub struct BootstrapArgs {
    /// Directory containing one subdirectory per audio source
    #[arg(value_name = "AUDIO_FILES_PATH")]
    pub audio_files_path: PathBuf,

    /// Path where the SQLite database should be created
    #[arg(value_name = "DB_OUTPUT_PATH")]
    pub db_output_path: PathBuf,

    /// Optional audio sources config (JSON)
    #[arg(value_name = "CONFIG_PATH")]
    pub config_path: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Initialize the audio database at the given locations.
///
/// Returns `true` when the database was built; any failure is logged and
/// reported as `false`. Files written before a failure are left in place.
pub fn bootstrap(audio_files_path: &Path, db_output_path: &Path, config_path: Option<&Path>) -> bool {
    info!("Bootstrapping database...");
    info!("Audio files path: {}", audio_files_path.display());
    info!("Database output path: {}", db_output_path.display());
    if let Some(config_path) = config_path {
        info!("Config path: {}", config_path.display());
    }

    let paths = BootstrapPaths::new(audio_files_path, db_output_path, config_path);
    debug!("data_dir: {:?}", paths.data_dir());
    debug!("db_file: {:?}", paths.db_file());
    debug!("version_file: {:?}", paths.version_file());
    debug!("config_file: {:?}", paths.config_file());
    debug!("default_config_file: {:?}", paths.default_config_file());

    match audio_db::init_database(&paths, &InitOptions::standalone()) {
        Ok(summary) => {
            info!(
                "✅ Database initialized successfully with {} entries: {}",
                summary.total_entries(),
                summary.db_file.display()
            );
            true
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            false
        }
    }
}

/// Parse `args` (including the program name) and run the bootstrapper, returning the exit code
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match BootstrapArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return 0;
        }
        Err(e) => {
            debug!("{}", AppError::Argument(e.to_string()));
            println!("{}", USAGE);
            return 1;
        }
    };

    if args.verbose {
        log::set_max_level(LevelFilter::Debug);
    }

    if bootstrap(
        &args.audio_files_path,
        &args.db_output_path,
        args.config_path.as_deref(),
    ) {
        0
    } else {
        1
    }
}
