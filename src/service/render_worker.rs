//! The PDF engine (pdfium) lives on a single worker thread for the whole process.
//!
//! The worker is started by the first call to [`RenderWorker::global`]; later
//! calls hand out the same worker. Render jobs are queued over a channel and
//! answered over a oneshot each, so callers never block the UI thread.
use crate::data::error::ResumeError;
use crate::data::thumbnail::{Thumbnail, ThumbnailRenderer};
use crate::data::ui_util::encode_png_thumbnail;
use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::OnceCell;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

static RENDER_WORKER: OnceCell<Arc<RenderWorker>> = OnceCell::new();

/// Widest bitmap pdfium is asked for, whatever the container measures.
pub const MAX_THUMBNAIL_WIDTH: u32 = 2048;

struct RenderJob {
    document: Bytes,
    width: u32,
    reply: oneshot::Sender<Result<Thumbnail, ResumeError>>,
}

pub struct RenderWorker {
    library: Option<PathBuf>,
    jobs: mpsc::UnboundedSender<RenderJob>,
}

impl RenderWorker {
    /// Returns the process-wide worker, starting it on first use.
    ///
    /// `library` is the pdfium shared library to bind (system library when
    /// `None`); it only matters for the first call.
    pub fn global(library: Option<&Path>) -> Arc<RenderWorker> {
        let worker =
            RENDER_WORKER.get_or_init(|| Arc::new(RenderWorker::spawn(library.map(Path::to_path_buf))));
        if worker.library.as_deref() != library {
            debug!(
                "Render worker already bound to {:?}, ignoring {:?}",
                worker.library, library
            );
        }
        Arc::clone(worker)
    }

    fn spawn(library: Option<PathBuf>) -> RenderWorker {
        let (jobs, mut queue) = mpsc::unbounded_channel::<RenderJob>();
        let bind_to = library.clone();

        let spawned = std::thread::Builder::new()
            .name("pdf-render".to_owned())
            .spawn(move || {
                let pdfium = bind_pdfium(bind_to.as_deref()).map(Pdfium::new);
                match &pdfium {
                    Ok(_) => info!("PDF engine ready"),
                    Err(err) => warn!("Couldn't load the PDF engine, thumbnails are disabled: {err}"),
                }
                while let Some(job) = queue.blocking_recv() {
                    let result = match &pdfium {
                        Ok(pdfium) => render_first_page(pdfium, &job.document, job.width),
                        Err(err) => Err(err.clone()),
                    };
                    // the item may have gone away in the meantime
                    job.reply.send(result).ok();
                }
                debug!("Render worker stopped");
            });
        if let Err(err) = spawned {
            warn!("Couldn't start render worker: {err}");
        }

        RenderWorker { library, jobs }
    }
}

fn bind_pdfium(library: Option<&Path>) -> Result<Box<dyn PdfiumLibraryBindings>, ResumeError> {
    let bindings = match library {
        Some(path) => Pdfium::bind_to_library(path.to_string_lossy().to_string()),
        None => Pdfium::bind_to_system_library(),
    };
    bindings.map_err(|err| ResumeError::RenderFailure(format!("pdfium unavailable: {err:?}")))
}

fn render_first_page(pdfium: &Pdfium, document: &[u8], width: u32) -> Result<Thumbnail, ResumeError> {
    let doc = pdfium
        .load_pdf_from_byte_slice(document, None)
        .map_err(|err| ResumeError::DecodeFailure(format!("{err:?}")))?;
    let page = doc
        .pages()
        .get(0)
        .map_err(|err| ResumeError::DecodeFailure(format!("no first page: {err:?}")))?;

    let config = PdfRenderConfig::new().set_target_width(target_width(width));
    let bitmap = page
        .render_with_config(&config)
        .map_err(|err| ResumeError::RenderFailure(format!("{err:?}")))?;

    encode_png_thumbnail(
        bitmap.width() as u32,
        bitmap.height() as u32,
        bitmap.as_rgba_bytes(),
    )
}

fn target_width(width: u32) -> Pixels {
    width.min(MAX_THUMBNAIL_WIDTH) as Pixels
}

#[async_trait]
impl ThumbnailRenderer for RenderWorker {
    async fn render_first_page(&self, document: Bytes, width: u32) -> Result<Thumbnail, ResumeError> {
        let (reply, answer) = oneshot::channel();
        self.jobs
            .send(RenderJob {
                document,
                width,
                reply,
            })
            .map_err(|_| ResumeError::RenderFailure("render worker has stopped".to_owned()))?;
        answer
            .await
            .map_err(|_| ResumeError::RenderFailure("render worker dropped the job".to_owned()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_global_worker_once() {
        let first = RenderWorker::global(None);
        let second = RenderWorker::global(Some(Path::new("/somewhere/else/libpdfium.so")));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn should_cap_target_width() {
        assert_eq!(target_width(480), 480);
        assert_eq!(target_width(MAX_THUMBNAIL_WIDTH), MAX_THUMBNAIL_WIDTH as Pixels);
        assert_eq!(target_width(100_000), MAX_THUMBNAIL_WIDTH as Pixels);
        assert_eq!(target_width(u32::MAX), MAX_THUMBNAIL_WIDTH as Pixels);
    }

    #[tokio::test]
    async fn should_fail_renders_without_engine() {
        let worker = RenderWorker::spawn(Some(PathBuf::from("/nonexistent/libpdfium.so")));
        let err = worker
            .render_first_page(Bytes::from_static(b"%PDF-1.7"), 100)
            .await
            .unwrap_err();
        assert!(matches!(err, ResumeError::RenderFailure(_)), "{err:?}");
    }
}
