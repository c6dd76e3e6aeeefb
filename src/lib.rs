/*!
 * # yomidict - Yomitan dictionary and audio tooling
 *
 * Two independent command-line tools built on one library:
 *
 * - `fetch_dicts`: downloads the latest releases of the tracked Yomitan
 *   dictionaries from GitHub, skipping files that are already on disk
 * - `audio_db_bootstrap`: builds the local audio SQLite database at
 *   caller-chosen locations
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Fetcher configuration and the tracked release sources
 * - `releases`: Release metadata clients:
 *   - `releases::github`: GitHub REST API client
 *   - `releases::mock`: In-memory client for tests
 * - `fetcher`: Per-source query, match and download workflow
 * - `audio_db`: Audio database initialization:
 *   - `audio_db::paths`: Path resolvers
 *   - `audio_db::config`: Audio sources configuration
 *   - `audio_db::schema`: SQLite schema
 *   - `audio_db::sources`: Source directory scanners
 * - `bootstrap`: Bootstrapper entry point and CLI
 * - `file_utils`: File system operations
 * - `logging`: Colored stdout logger
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod audio_db;
pub mod bootstrap;
pub mod errors;
pub mod fetcher;
pub mod file_utils;
pub mod logging;
pub mod releases;

// Re-export main types for easier usage
pub use app_config::{FetcherConfig, ReleaseDescriptor};
pub use bootstrap::bootstrap;
pub use errors::{AppError, FetchError, InitError};
pub use fetcher::{DictionaryFetcher, SourceOutcome, SourceReport};
