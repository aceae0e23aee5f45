// bases/download_cli/src/app.rs
use color_eyre::eyre::bail;
use color_eyre::Result;
use download_client::HttpDownloadService;
use job_poller::{DownloadController, TokioScheduler};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::{Action, Config};
use crate::output::OutputHandler;

pub struct App {
    config: Config,
    output: Arc<OutputHandler>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let output = Arc::new(OutputHandler::new(config.verbose));
        Self { config, output }
    }

    /// Run the configured action; Ctrl-C aborts it
    pub async fn run(&self) -> Result<()> {
        let shutdown = CancellationToken::new();
        tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    shutdown.cancel();
                }
            }
        });
        self.run_until(shutdown).await
    }

    /// Run the configured action until it finishes or `shutdown` fires
    pub async fn run_until(&self, shutdown: CancellationToken) -> Result<()> {
        let service = Arc::new(HttpDownloadService::new(self.config.server.clone())?);
        tracing::debug!(server = %service.base_url(), "Using download service");
        let mut controller = DownloadController::new(
            service.clone(),
            Arc::new(TokioScheduler),
            self.output.clone(),
            self.config.poller.clone(),
        );
        controller.check_for_update();

        match &self.config.action {
            Action::Info { url } => {
                let info = controller.video_info(url).await?;
                self.output.print_video_info(&info);
            }
            Action::Download {
                url,
                format,
                quality,
                output_dir,
            } => {
                self.output.print_download_start(url, *format, *quality);
                let job_id = controller.submit(url, *format, *quality).await?;
                tracing::debug!(
                    job_id = %job_id,
                    max_polls = controller.poller_config().max_polls,
                    "Waiting for download"
                );

                let finished = tokio::select! {
                    job = controller.wait() => Some(job),
                    _ = shutdown.cancelled() => None,
                };
                let Some(job) = finished else {
                    controller.stop_polling().await;
                    bail!("Download cancelled");
                };
                let job = job?;

                match output_dir {
                    Some(dir) => {
                        let path = tokio::select! {
                            path = controller.fetch_artifact(&job.id, dir) => path?,
                            _ = shutdown.cancelled() => bail!("Download cancelled"),
                        };
                        self.output.print_saved(&path);
                    }
                    None => self.output.print_download_link(&service.file_url(&job.id)?),
                }
            }
        }

        Ok(())
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_error(error);
    }
}
