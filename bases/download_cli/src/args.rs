// bases/download_cli/src/args.rs
use clap::{Parser, Subcommand, ValueEnum};
use download_protocol::{Format, Quality};
use std::path::PathBuf;
use url::Url;

/// Fetch videos and audio through a media download service
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Base URL of the download service
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    pub server: Url,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show title, uploader, duration and views of a video
    Info {
        /// Video URL
        url: String,
    },

    /// Start a download and follow it until it finishes
    Download {
        /// Video URL
        url: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Mp4)]
        format: FormatArg,

        /// Video quality (ignored for audio formats)
        #[arg(short, long, value_enum, default_value_t = QualityArg::Best)]
        quality: QualityArg,

        /// Directory to store the downloaded file
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Leave the file on the service instead of fetching it
        #[arg(long)]
        no_fetch: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Mp4,
    Mp3,
    M4a,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Mp4 => Format::Mp4,
            FormatArg::Mp3 => Format::Mp3,
            FormatArg::M4a => Format::M4a,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityArg {
    Best,
    #[value(name = "720p")]
    P720,
    #[value(name = "480p")]
    P480,
    #[value(name = "360p")]
    P360,
    Worst,
}

impl From<QualityArg> for Quality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Best => Quality::Best,
            QualityArg::P720 => Quality::P720,
            QualityArg::P480 => Quality::P480,
            QualityArg::P360 => Quality::P360,
            QualityArg::Worst => Quality::Worst,
        }
    }
}
