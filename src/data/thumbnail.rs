//! First-page thumbnails of fetched résumés.
//!
//! [`ThumbnailPipeline`] decides *when* a thumbnail has to be (re)rendered:
//! once per resource and width. The actual rasterising is delegated to a
//! [`ThumbnailRenderer`], normally the process-wide
//! [`RenderWorker`](crate::service::render_worker::RenderWorker).
use crate::data::error::ResumeError;
use crate::data::load_state::LocalResource;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use futures::future::{AbortHandle, Aborted, BoxFuture};
use futures::FutureExt;
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// A PNG image of a document's first page.
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    png: Bytes,
}

impl Thumbnail {
    pub fn new(width: u32, height: u32, png: Bytes) -> Thumbnail {
        Thumbnail { width, height, png }
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// `data:` URL usable as an `img` source.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thumbnail({}x{}, {} bytes)", self.width, self.height, self.png.len())
    }
}

#[async_trait]
pub trait ThumbnailRenderer: Send + Sync {
    /// Renders page 1 of `document` scaled to `width` pixels.
    async fn render_first_page(&self, document: Bytes, width: u32) -> Result<Thumbnail, ResumeError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailState {
    /// Nothing to show yet: no document, or no width measured.
    Idle,
    Rendering,
    Rendered(Thumbnail),
    Failed(ResumeError),
}

pub type ThumbnailListener = Arc<dyn Fn(&ThumbnailState) + Send + Sync>;

/// What the current thumbnail was rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderKey {
    resource: PathBuf,
    width: u32,
}

struct ThumbnailSlot {
    generation: u64,
    key: Option<RenderKey>,
    state: ThumbnailState,
    in_flight: Option<AbortHandle>,
    disposed: bool,
    render_count: u64,
}

#[derive(Clone)]
pub struct ThumbnailPipeline {
    renderer: Arc<dyn ThumbnailRenderer>,
    slot: Arc<Mutex<ThumbnailSlot>>,
    listener: ThumbnailListener,
}

impl ThumbnailPipeline {
    pub fn new(renderer: Arc<dyn ThumbnailRenderer>, listener: ThumbnailListener) -> ThumbnailPipeline {
        ThumbnailPipeline {
            renderer,
            slot: Arc::new(Mutex::new(ThumbnailSlot {
                generation: 0,
                key: None,
                state: ThumbnailState::Idle,
                in_flight: None,
                disposed: false,
                render_count: 0,
            })),
            listener,
        }
    }

    pub fn state(&self) -> ThumbnailState {
        self.slot.lock().state.clone()
    }

    pub fn render_count(&self) -> u64 {
        self.slot.lock().render_count
    }

    /// Brings the thumbnail in line with `resource` and `width`.
    ///
    /// Without a resource the thumbnail is dropped. Without a width (not measured
    /// yet) whatever is shown stays until a width is known. Returns the render
    /// task to drive when a new render is needed.
    pub fn request(
        &self,
        resource: Option<&Arc<LocalResource>>,
        width: Option<u32>,
    ) -> Option<BoxFuture<'static, ()>> {
        let mut slot = self.slot.lock();
        if slot.disposed {
            return None;
        }

        let resource = match resource {
            Some(resource) => resource,
            None => {
                if slot.key.is_none() && slot.state == ThumbnailState::Idle {
                    return None;
                }
                Self::cancel(&mut slot);
                slot.state = ThumbnailState::Idle;
                drop(slot);
                (self.listener)(&ThumbnailState::Idle);
                return None;
            }
        };
        let width = match width {
            Some(width) if width > 0 => width,
            _ => return None,
        };

        let key = RenderKey {
            resource: resource.path().to_owned(),
            width,
        };
        if slot.key.as_ref() == Some(&key) {
            return None;
        }

        Self::cancel(&mut slot);
        slot.key = Some(key);
        slot.state = ThumbnailState::Rendering;
        slot.render_count += 1;
        let generation = slot.generation;
        debug!("Rendering thumbnail of {} at {width}px", resource.filename());

        let renderer = Arc::clone(&self.renderer);
        let document = resource.bytes();
        let (render, handle) = futures::future::abortable(async move {
            renderer.render_first_page(document, width).await
        });
        slot.in_flight = Some(handle);
        drop(slot);
        (self.listener)(&ThumbnailState::Rendering);

        let shared = Arc::clone(&self.slot);
        let listener = Arc::clone(&self.listener);
        let filename = resource.filename().to_owned();
        Some(
            async move {
                let outcome = match render.await {
                    Ok(outcome) => outcome,
                    Err(Aborted) => return,
                };

                let mut slot = shared.lock();
                if slot.disposed || slot.generation != generation {
                    debug!("Discarding stale thumbnail of {filename}");
                    return;
                }
                slot.in_flight = None;
                slot.state = match outcome {
                    Ok(thumbnail) => ThumbnailState::Rendered(thumbnail),
                    Err(err) => {
                        warn!("Thumbnail of {filename}: {err}");
                        ThumbnailState::Failed(err)
                    }
                };
                let state = slot.state.clone();
                drop(slot);
                listener(&state);
            }
            .boxed(),
        )
    }

    pub fn dispose(&self) {
        let mut slot = self.slot.lock();
        if slot.disposed {
            return;
        }
        slot.disposed = true;
        Self::cancel(&mut slot);
        slot.state = ThumbnailState::Idle;
    }

    fn cancel(slot: &mut ThumbnailSlot) {
        slot.generation += 1;
        slot.key = None;
        if let Some(handle) = slot.in_flight.take() {
            handle.abort();
        }
    }
}
