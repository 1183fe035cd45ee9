//! Configuration management for the Discogs to Tidal sync CLI.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Discogs and Tidal API
//! credentials and endpoints.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `discosync/.env`. This allows users to store
/// API tokens securely without hardcoding sensitive values.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/discosync/.env`
/// - macOS: `~/Library/Application Support/discosync/.env`
/// - Windows: `%LOCALAPPDATA%/discosync/.env`
///
/// # Returns
///
/// Returns `Ok(())` if the environment file is successfully loaded, or an
/// error string if directory creation or file loading fails.
///
/// # Example
///
/// ```
/// use discosync::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("discosync/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(path).map_err(|e| e.to_string())?;
    Ok(())
}

/// Returns the Discogs API base URL.
///
/// Retrieves the `DISCOGS_API_URL` environment variable or falls back to
/// the public endpoint `https://api.discogs.com`.
pub fn discogs_apiurl() -> String {
    env::var("DISCOGS_API_URL").unwrap_or_else(|_| "https://api.discogs.com".to_string())
}

/// Returns the Discogs personal access token.
///
/// Retrieves the `DISCOGS_TOKEN` environment variable which contains the
/// personal access token generated in the Discogs developer settings. The
/// token grants read access to the user's collection folders.
///
/// # Panics
///
/// Panics if the `DISCOGS_TOKEN` environment variable is not set.
pub fn discogs_token() -> String {
    env::var("DISCOGS_TOKEN").expect("DISCOGS_TOKEN must be set")
}

/// Returns the Discogs username whose collection is synchronized.
///
/// # Panics
///
/// Panics if the `DISCOGS_USERNAME` environment variable is not set.
pub fn discogs_username() -> String {
    env::var("DISCOGS_USERNAME").expect("DISCOGS_USERNAME must be set")
}

/// Returns the Tidal API base URL.
///
/// Retrieves the `TIDAL_API_URL` environment variable or falls back to
/// `https://api.tidal.com/v1`.
pub fn tidal_apiurl() -> String {
    env::var("TIDAL_API_URL").unwrap_or_else(|_| "https://api.tidal.com/v1".to_string())
}

/// Returns the Tidal API access token.
///
/// Session lifecycle (OAuth flows, token refresh) is out of scope for this
/// tool; a valid bearer token is expected to be provided via environment.
///
/// # Panics
///
/// Panics if the `TIDAL_TOKEN` environment variable is not set.
pub fn tidal_token() -> String {
    env::var("TIDAL_TOKEN").expect("TIDAL_TOKEN must be set")
}

/// Returns the Tidal user ID for playlist operations.
///
/// # Panics
///
/// Panics if the `TIDAL_USER_ID` environment variable is not set.
pub fn tidal_user() -> String {
    env::var("TIDAL_USER_ID").expect("TIDAL_USER_ID must be set")
}

/// Returns the country code used for Tidal catalog queries.
///
/// Retrieves the `TIDAL_COUNTRY_CODE` environment variable or falls back
/// to `US`. Catalog availability differs between markets, so search results
/// depend on this value.
pub fn tidal_country_code() -> String {
    env::var("TIDAL_COUNTRY_CODE").unwrap_or_else(|_| "US".to_string())
}
