//! Pipeline orchestrator: one "processing" and exactly one terminal
//! notification per detected link, strictly in scan order.

use tracing::{info, warn};

use crate::{
    download::Downloader,
    error::FailureKind,
    fetch::MediaPayload,
    scan::{self, Link},
};

/// Terminal state of one link's pipeline run.
#[derive(Debug)]
pub enum LinkOutcome {
    /// The rendition was fetched; payload ownership moves to the sink for
    /// immediate re-transmission.
    Delivered(MediaPayload),
    Failed(FailureKind),
}

/// Caller-supplied notification surface.
///
/// [`processing`](Self::processing) fires once before a link's pipeline runs
/// and returns an edit-capable handle (for Telegram, the sent message's id);
/// [`completed`](Self::completed) fires exactly once afterwards with the same
/// handle so the caller can edit the processing notification in place.
#[async_trait::async_trait]
pub trait ProgressSink: Send + Sync {
    type Handle: Send;

    async fn processing(&self, link: &Link) -> anyhow::Result<Self::Handle>;
    async fn completed(&self, handle: Self::Handle, outcome: LinkOutcome) -> anyhow::Result<()>;
}

/// Drives the per-link pipeline over a sinkful of notifications.
pub struct Pipeline<D> {
    downloader: D,
}

impl<D: Downloader> Pipeline<D> {
    #[must_use]
    pub fn new(downloader: D) -> Self {
        Self { downloader }
    }

    /// Scan `text` and run the pipeline for each link found, sequentially and
    /// in order of appearance. Text without links emits nothing. Returns the
    /// number of links found.
    ///
    /// Sink failures are logged and never abort the remaining links; a link
    /// whose processing notification failed is skipped, every other link
    /// still gets its own pair of notifications.
    pub async fn run<S: ProgressSink>(&self, text: &str, sink: &S) -> usize {
        let links: Vec<Link> = scan::scan(text).collect();
        for link in &links {
            self.run_one(link, sink).await;
        }
        links.len()
    }

    async fn run_one<S: ProgressSink>(&self, link: &Link, sink: &S) {
        let handle = match sink.processing(link).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(link = %link, error = %e, "processing notification failed, skipping link");
                return;
            },
        };

        let outcome = match self.downloader.download(link).await {
            Ok(payload) => {
                info!(link = %link, bytes = payload.bytes.len(), "rendition ready");
                LinkOutcome::Delivered(payload)
            },
            Err(err) => {
                warn!(link = %link, kind = err.kind().as_str(), error = %err, "link failed");
                LinkOutcome::Failed(err.kind())
            },
        };

        if let Err(e) = sink.completed(handle, outcome).await {
            warn!(link = %link, error = %e, "terminal notification failed");
        }
    }
}
