//! Similar-Track Finder Library
//!
//! This library finds tracks that sound like a given seed track. It fetches
//! audio features (tempo, key, energy, danceability, valence, ...) from an
//! analysis provider, scores candidate tracks against the seed and ranks them.
//! Key compatibility follows the harmonic-mixing rules DJs use, including
//! Camelot-wheel notation.
//!
//! # Modules
//!
//! - `analysis` - Key theory, similarity scoring, enrichment and ranking
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by the analysis components
//! - `features` - Batched, rate-limited audio-feature retrieval
//! - `management` - Access token cache
//! - `reccobeats` - ReccoBeats audio-feature provider
//! - `spotify` - Spotify Web API catalog and feature provider
//! - `types` - Data structures and type definitions
//! - `utils` - Formatting and identifier helpers
//!
//! # Example
//!
//! ```
//! use trackmatch::analysis::{are_keys_compatible, camelot_key};
//! use trackmatch::types::Mode;
//!
//! assert_eq!(camelot_key(Some(0), Mode::Major), Some("8B"));
//! assert!(are_keys_compatible(0, Mode::Major, 9, Mode::Minor));
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
mod http;
pub mod management;
pub mod reccobeats;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching audio features for {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Ranked {} candidates", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the command layer uses this macro. Library code reports recoverable
/// problems with [`warning!`] and returns errors for the rest.
///
/// # Example
///
/// ```
/// error!("Cannot analyze seed track: {}", err);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for failures the application recovers from, such as a feature batch
/// that could not be fetched after all retries.
///
/// # Example
///
/// ```
/// warning!("Feature batch {} failed: {}", index, err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
