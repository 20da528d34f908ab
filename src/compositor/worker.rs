//! Compositor context — a task that owns the pixel work.
//!
//! The driver spins one up per finished session, submits a single job,
//! receives exactly one [`CompositorEvent`] back and closes it again.
//! Decoding, blitting and PNG encoding run on the blocking pool so the
//! async side never stalls on pixels.

use super::{data_url, region, stitch, CompositeError, CompositorEvent, CompositorJob};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

struct Envelope {
    job: CompositorJob,
    reply: oneshot::Sender<CompositorEvent>,
}

/// Handle to a running compositor context.
pub struct Compositor {
    jobs: mpsc::Sender<Envelope>,
    task: JoinHandle<()>,
}

impl Compositor {
    /// Start a compositor context on the current tokio runtime.
    pub fn spawn() -> Self {
        let (jobs, mut inbox) = mpsc::channel::<Envelope>(4);

        let task = tokio::spawn(async move {
            log::debug!("[COMPOSITOR] Context started");
            while let Some(Envelope { job, reply }) = inbox.recv().await {
                let kind = job.kind();
                let event = match tokio::task::spawn_blocking(move || process(job)).await {
                    Ok(event) => event,
                    Err(e) => CompositorEvent::Failed {
                        kind,
                        message: format!("compositor job aborted: {}", e),
                    },
                };
                // Submitter may have gone away; nothing left to tell it.
                let _ = reply.send(event);
            }
            log::debug!("[COMPOSITOR] Context closed");
        });

        Self { jobs, task }
    }

    /// Submit one job and wait for its completion event.
    pub async fn submit(&self, job: CompositorJob) -> CompositorEvent {
        let kind = job.kind();
        let closed = || CompositorEvent::Failed {
            kind,
            message: CompositeError::ContextClosed.to_string(),
        };

        let (reply, response) = oneshot::channel();
        if self.jobs.send(Envelope { job, reply }).await.is_err() {
            return closed();
        }
        response.await.unwrap_or_else(|_| closed())
    }

    /// Spin up a context for a single job and tear it down afterwards.
    pub async fn run_once(job: CompositorJob) -> CompositorEvent {
        let compositor = Self::spawn();
        let event = compositor.submit(job).await;
        compositor.close().await;
        event
    }

    /// Tear the context down, waiting for in-flight work to finish.
    pub async fn close(self) {
        drop(self.jobs);
        if let Err(e) = self.task.await {
            log::warn!("[COMPOSITOR] Context did not shut down cleanly: {}", e);
        }
    }
}

/// Run one job synchronously and wrap the outcome as an event.
pub fn process(job: CompositorJob) -> CompositorEvent {
    let kind = job.kind();
    let start = std::time::Instant::now();

    match run(job) {
        Ok(data_url) => {
            log::info!(
                "[COMPOSITOR] {} complete in {}ms ({} bytes)",
                kind,
                start.elapsed().as_millis(),
                data_url.len()
            );
            CompositorEvent::Complete { kind, data_url }
        }
        Err(e) => {
            log::error!("[COMPOSITOR] {} failed: {}", kind, e);
            CompositorEvent::Failed {
                kind,
                message: e.to_string(),
            }
        }
    }
}

fn run(job: CompositorJob) -> Result<String, CompositeError> {
    match job {
        CompositorJob::Crop(request) => {
            let image = data_url::decode(&request.data_url)?;
            let cropped = region::crop(&image, &request.area)?;
            log::info!(
                "[COMPOSITOR] Cropped {}x{} capture to {}x{}",
                image.width(),
                image.height(),
                cropped.width(),
                cropped.height()
            );
            data_url::encode_png(&cropped)
        }
        CompositorJob::Stitch(request) => {
            let images = request
                .captures
                .iter()
                .map(|c| data_url::decode(c))
                .collect::<Result<Vec<_>, _>>()?;
            let page = stitch::stitch(&images, &request.page_dimensions)?;
            data_url::encode_png(&page)
        }
    }
}
