//! conform command-line driver.
//!
//! The binary in `main.rs` only parses arguments and maps results to exit
//! codes; the commands themselves live in [`commands`] and return their
//! output as text so they can be tested without a process.

pub mod commands;

use std::path::PathBuf;
use std::sync::Once;

use conform_check::TypeError;
use conform_types::{DeclError, Name, ParseError};
use conform_value::json::JsonError;

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Only installs a subscriber when `RUST_LOG` is set, so normal runs pay
/// nothing for the library's spans and events.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

/// Everything a command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("in `{}`: {source}", path.display())]
    Decl {
        path: PathBuf,
        #[source]
        source: DeclError,
    },

    #[error("`{}` is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{}` is not valid YAML: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("`{}`: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: JsonError,
    },

    #[error("`{}`: unsupported document format (expected .json, .yaml or .yml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("bad target type: {0}")]
    Target(#[from] ParseError),

    #[error("`{0}` is not a declared type")]
    UnknownType(Name),

    #[error("cannot render result as JSON: {0}")]
    Render(#[source] serde_json::Error),

    #[error(transparent)]
    Conform(#[from] TypeError),
}

impl CliError {
    /// Process exit code: 1 when the data does not conform, 2 for anything
    /// that stopped the check from running.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Conform(_) => 1,
            _ => 2,
        }
    }
}
