//! Configuration loader and defaults for the appshelf server.
//!
//! Reads values from environment variables (with sensible defaults where a
//! default is safe). Fields cover the database path, the public hostname
//! used in sitemap/robots output, the listening port, the template and
//! static asset directories, and the admin credential.
//!
use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Default SQLite database file, relative to the working directory
const DEFAULT_DB: &str = "appshelf.db";
/// Default public hostname used in sitemap and robots output
const DEFAULT_HOSTNAME: &str = "localhost";
/// Default admin username for the basic-auth gate
const DEFAULT_ADMIN_USER: &str = "admin";

const DEFAULT_PORT: u16 = 8000;

/// Application configuration, read-only after startup
#[derive(Debug)]
pub(crate) struct Config {
    /// SQLite database file path
    pub(crate) db: String,
    /// Public hostname (no scheme) for sitemap/robots links
    pub(crate) hostname: String,
    /// HTTP listening port
    pub(crate) port: u16,
    /// Directory holding the HTML templates
    pub(crate) templates_dir: PathBuf,
    /// Directory served verbatim under /static/
    pub(crate) static_dir: PathBuf,
    /// Admin username
    pub(crate) admin_user: String,
    /// Admin password. There is deliberately no default: when unset, every
    /// admin request is rejected with 401.
    pub(crate) admin_password: Option<String>,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        let admin_password = env::var("APPSHELF_ADMIN_PASSWORD").ok();
        if admin_password.is_none() {
            warn!("APPSHELF_ADMIN_PASSWORD is not set, admin panel is locked");
        }

        Config {
            db: env::var("APPSHELF_DB").unwrap_or_else(|_| DEFAULT_DB.into()),
            hostname: env::var("APPSHELF_HOSTNAME").unwrap_or_else(|_| DEFAULT_HOSTNAME.into()),
            port: env::var("APPSHELF_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            templates_dir: env::var("APPSHELF_TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("templates")),
            static_dir: env::var("APPSHELF_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
            admin_user: env::var("APPSHELF_ADMIN_USER")
                .unwrap_or_else(|_| DEFAULT_ADMIN_USER.into()),
            admin_password,
        }
    }
}
