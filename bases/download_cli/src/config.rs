// bases/download_cli/src/config.rs
use crate::args::{CliArgs, Command};
use download_protocol::{Format, Quality};
use job_poller::PollerConfig;
use std::path::PathBuf;
use url::Url;

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Info {
        url: String,
    },
    Download {
        url: String,
        format: Format,
        quality: Quality,
        /// Where to save the file; `None` leaves it on the service
        output_dir: Option<PathBuf>,
    },
}

/// Download CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the download service
    pub server: Url,

    pub verbose: bool,

    pub action: Action,

    pub poller: PollerConfig,
}

impl Config {
    /// Create configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Self {
        let action = match args.command {
            Command::Info { url } => Action::Info { url },
            Command::Download {
                url,
                format,
                quality,
                output_dir,
                no_fetch,
            } => Action::Download {
                url,
                format: format.into(),
                quality: quality.into(),
                output_dir: (!no_fetch).then_some(output_dir),
            },
        };

        Self {
            server: args.server,
            verbose: args.verbose,
            action,
            poller: PollerConfig::default(),
        }
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "download_cli=debug,job_poller=debug,download_client=debug"
        } else {
            "download_cli=warn,job_poller=warn,download_client=warn"
        }
    }
}
