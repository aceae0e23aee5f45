// bases/download_cli/src/output.rs
use download_protocol::{format_view_count, Format, Job, JobId, Quality, VideoInfo};
use job_poller::{PollError, ProgressSink, ProgressView, COMPLETE_HEADLINE, PREPARING_HEADLINE};
use parking_lot::Mutex;
use std::path::Path;
use url::Url;

pub struct OutputHandler {
    verbose: bool,
    /// Last headline and status line printed, to skip repeats
    shown: Mutex<(Option<String>, Option<String>)>,
}

impl OutputHandler {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            shown: Mutex::new((None, None)),
        }
    }

    pub fn print_video_info(&self, info: &VideoInfo) {
        println!("Title: {}", info.title.as_deref().unwrap_or("Unknown Title"));
        println!(
            "Uploader: {}",
            info.uploader.as_deref().unwrap_or("Unknown Uploader")
        );
        println!("Duration: {}", info.duration);
        println!("Views: {}", format_view_count(info.view_count.unwrap_or(0)));

        if self.verbose {
            if let Some(thumbnail) = info.thumbnail.as_deref().filter(|t| !t.is_empty()) {
                println!("Thumbnail: {}", thumbnail);
            }
        }
    }

    pub fn print_download_start(&self, url: &str, format: Format, quality: Quality) {
        if format.is_audio() {
            println!("Requesting {} audio from: {}", format, url);
        } else {
            println!("Requesting {} ({}) from: {}", format, quality, url);
        }
    }

    pub fn print_saved(&self, path: &Path) {
        println!("Saved to {}", path.display());
    }

    pub fn print_download_link(&self, link: &Url) {
        println!("File available at {}", link);
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }

    fn show_headline(&self, headline: &str) {
        let mut shown = self.shown.lock();
        if shown.0.as_deref() != Some(headline) {
            println!("{}", headline);
            shown.0 = Some(headline.to_string());
        }
    }

    fn show_status(&self, status: &str) {
        let mut shown = self.shown.lock();
        if shown.1.as_deref() != Some(status) {
            println!("  {}", status);
            shown.1 = Some(status.to_string());
        }
    }
}

impl ProgressSink for OutputHandler {
    fn started(&self, job: &JobId) {
        *self.shown.lock() = (None, None);
        if self.verbose {
            println!("Tracking job {}", job);
        }
        self.show_headline(PREPARING_HEADLINE);
        self.show_status("0%");
    }

    fn progress(&self, _job: &JobId, view: &ProgressView) {
        if let Some(headline) = &view.headline {
            self.show_headline(headline);
        }
        self.show_status(&view.status_text);
    }

    fn completed(&self, job: &Job) {
        self.show_status("100% - Complete!");
        self.show_headline(COMPLETE_HEADLINE);
        if self.verbose {
            if let Some(title) = &job.title {
                println!("Title: {}", title);
            }
        }
    }

    fn failed(&self, job: &JobId, error: &PollError) {
        // The error itself is printed once by main
        if !self.verbose {
            return;
        }
        match error {
            PollError::Timeout { polls } => {
                eprintln!("Job {} still running after {} checks", job, polls)
            }
            PollError::Unreachable {
                attempts,
                last_error,
            } => eprintln!(
                "Job {}: {} checks in a row failed, last: {}",
                job, attempts, last_error
            ),
            PollError::Server(_) | PollError::Cancelled => {}
        }
    }
}
