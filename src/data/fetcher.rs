//! ResumeFetcher downloads the résumé of a listing and tracks its [`LoadState`].
//!
//! Requests are sequenced: each new filename bumps a generation counter and
//! aborts the request in flight, and a completing request only commits its
//! result when its generation is still current and the fetcher hasn't been
//! disposed. The last *requested* document always wins.
//!
//! The fetcher is built on top of `Arc` and can be cloned cheaply; clones
//! share the same state.
use crate::data::load_state::{LoadState, LocalResource};
use crate::data::resume_listing::ResumeListing;
use crate::service::marketplace::DocumentService;
use futures::future::{AbortHandle, Aborted, BoxFuture};
use futures::FutureExt;
use parking_lot::Mutex;
use std::sync::Arc;

pub type StateListener = Arc<dyn Fn(&LoadState) + Send + Sync>;

/// What the fetcher was last asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    Nothing,
    Invalid,
    File(String),
}

struct FetchSlot {
    generation: u64,
    request: Request,
    state: LoadState,
    in_flight: Option<AbortHandle>,
    disposed: bool,
    fetch_count: u64,
}

#[derive(Clone)]
pub struct ResumeFetcher {
    source: Arc<dyn DocumentService>,
    slot: Arc<Mutex<FetchSlot>>,
    listener: StateListener,
}

impl ResumeFetcher {
    pub fn new(source: Arc<dyn DocumentService>, listener: StateListener) -> ResumeFetcher {
        ResumeFetcher {
            source,
            slot: Arc::new(Mutex::new(FetchSlot {
                generation: 0,
                request: Request::Nothing,
                state: LoadState::Loading,
                in_flight: None,
                disposed: false,
                fetch_count: 0,
            })),
            listener,
        }
    }

    pub fn state(&self) -> LoadState {
        self.slot.lock().state.clone()
    }

    /// Number of requests actually sent to the document service.
    pub fn fetch_count(&self) -> u64 {
        self.slot.lock().fetch_count
    }

    /// Filename of the current request, if any.
    pub fn filename(&self) -> Option<String> {
        match &self.slot.lock().request {
            Request::File(filename) => Some(filename.clone()),
            _ => None,
        }
    }

    /// Makes sure the résumé of `listing` is (being) fetched.
    ///
    /// Returns the task to drive when a new request has to be made, `None` when
    /// the listing's résumé is already requested or the listing is unusable
    /// (the state then holds `Failed(InvalidInput)`).
    pub fn fetch(&self, listing: &ResumeListing) -> Option<BoxFuture<'static, ()>> {
        let derived = listing.resume_filename();
        let request = match &derived {
            Ok(filename) => Request::File(filename.clone()),
            Err(_) => Request::Invalid,
        };

        let mut slot = self.slot.lock();
        if slot.disposed || slot.request == request {
            return None;
        }

        slot.generation += 1;
        slot.request = request;
        if let Some(handle) = slot.in_flight.take() {
            debug!("Aborting superseded résumé request");
            handle.abort();
        }

        let filename = match derived {
            Ok(filename) => filename,
            Err(err) => {
                warn!("Not fetching résumé of listing '{}': {err}", listing.id);
                // drops any resource held by the previous state
                slot.state = LoadState::Failed(err);
                let state = slot.state.clone();
                drop(slot);
                (self.listener)(&state);
                return None;
            }
        };

        slot.state = LoadState::Loading;
        slot.fetch_count += 1;
        let generation = slot.generation;
        info!("Fetching résumé {filename} for listing '{}'", listing.id);

        let source = Arc::clone(&self.source);
        let request_filename = filename.clone();
        let (request, handle) = futures::future::abortable(async move {
            source.fetch_resume(&request_filename).await
        });
        slot.in_flight = Some(handle);
        drop(slot);
        (self.listener)(&LoadState::Loading);

        let shared = Arc::clone(&self.slot);
        let listener = Arc::clone(&self.listener);
        Some(
            async move {
                let outcome = match request.await {
                    Ok(outcome) => outcome,
                    Err(Aborted) => {
                        debug!("Request for {filename} was aborted");
                        return;
                    }
                };

                let mut slot = shared.lock();
                if slot.disposed || slot.generation != generation {
                    debug!("Discarding stale response for {filename}");
                    return;
                }
                slot.in_flight = None;
                slot.state = match outcome.and_then(|bytes| LocalResource::create(&filename, bytes)) {
                    Ok(resource) => LoadState::Ready(Arc::new(resource)),
                    Err(err) => {
                        warn!("{err}");
                        LoadState::Failed(err)
                    }
                };
                let state = slot.state.clone();
                drop(slot);
                listener(&state);
            }
            .boxed(),
        )
    }

    /// Tears the fetcher down: aborts the request in flight and releases the
    /// local resource. Nothing is committed or reported afterwards.
    pub fn dispose(&self) {
        let mut slot = self.slot.lock();
        if slot.disposed {
            return;
        }
        slot.disposed = true;
        slot.generation += 1;
        if let Some(handle) = slot.in_flight.take() {
            handle.abort();
        }
        slot.state = LoadState::Loading;
        debug!("Disposed résumé fetcher");
    }
}
