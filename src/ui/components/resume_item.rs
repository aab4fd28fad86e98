use crate::data::fetcher::{ResumeFetcher, StateListener};
use crate::data::load_state::LoadState;
use crate::data::resume_listing::ResumeListing;
use crate::data::thumbnail::{Thumbnail, ThumbnailListener, ThumbnailPipeline, ThumbnailState};
use crate::data::ui_util::open_in_new_tab;
use crate::data::width_tracker::ViewportWidthTracker;
use crate::ui::components::tag_list::TagList;
use crate::ui::ResumeServices;
use dioxus::prelude::*;
use std::sync::Arc;

pub const LOADING: &str = "Loading...";
pub const RENDERING: &str = "Rendering...";

/// What the document area of an item shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemView {
    Loading,
    Error(&'static str),
    Rendering,
    Thumbnail(Thumbnail),
}

/// Failures win over everything else, and a thumbnail is only shown while
/// its document is ready.
pub fn item_view(load_state: &LoadState, thumbnail_state: &ThumbnailState) -> ItemView {
    match (load_state, thumbnail_state) {
        (LoadState::Loading, _) => ItemView::Loading,
        (LoadState::Failed(err), _) | (LoadState::Ready(_), ThumbnailState::Failed(err)) => {
            ItemView::Error(err.user_message())
        }
        (LoadState::Ready(_), ThumbnailState::Rendered(thumbnail)) => {
            ItemView::Thumbnail(thumbnail.clone())
        }
        (LoadState::Ready(_), ThumbnailState::Idle | ThumbnailState::Rendering) => {
            ItemView::Rendering
        }
    }
}

fn open_logged(target: &str) {
    if let Err(err) = open_in_new_tab(target) {
        warn!("{err:#}");
    }
}

/// One marketplace listing: first page of the résumé, an "open" button and the tags.
#[component]
pub fn ResumeItem(resume: ResumeListing) -> Element {
    let services = use_context::<ResumeServices>();
    let mut width = use_signal(ViewportWidthTracker::default);

    let fetcher = use_hook(|| {
        let update = schedule_update();
        let listener: StateListener = Arc::new(move |_: &LoadState| update());
        ResumeFetcher::new(Arc::clone(&services.documents), listener)
    });
    let thumbnails = use_hook(|| {
        let update = schedule_update();
        let listener: ThumbnailListener = Arc::new(move |_: &ThumbnailState| update());
        ThumbnailPipeline::new(Arc::clone(&services.renderer), listener)
    });
    use_drop({
        let fetcher = fetcher.clone();
        let thumbnails = thumbnails.clone();
        move || {
            fetcher.dispose();
            thumbnails.dispose();
        }
    });

    // Both are no-ops unless the résumé or the measured width changed
    if let Some(task) = fetcher.fetch(&resume) {
        spawn(task);
    }
    let load_state = fetcher.state();
    if let Some(task) = thumbnails.request(load_state.resource(), width.read().target()) {
        spawn(task);
    }
    let thumbnail_state = thumbnails.state();

    let server_url = resume
        .resume_filename()
        .ok()
        .map(|filename| services.documents.resume_url(&filename).to_string());
    let local_path = load_state
        .resource()
        .map(|resource| resource.path().to_string_lossy().into_owned());
    let can_open = local_path.is_some();

    rsx! {
        div {
            class: "resume-item",
            div {
                class: "icon",
                button {
                    class: "icon-button",
                    title: "Open résumé",
                    disabled: !can_open,
                    onclick: move |_| {
                        if let Some(path) = &local_path {
                            open_logged(path);
                        }
                    },
                    "⧉"
                }
            }
            div {
                class: "pdf-document",
                onresize: move |event| {
                    if let Ok(size) = event.get_content_box_size() {
                        let mut tracker = *width.peek();
                        if tracker.observe(size.width) {
                            width.set(tracker);
                        }
                    }
                },
                {match item_view(&load_state, &thumbnail_state) {
                    ItemView::Loading => rsx! { p { {LOADING} } },
                    ItemView::Error(message) => rsx! {
                        p {
                            class: "error",
                            {message}
                        }
                    },
                    ItemView::Thumbnail(thumbnail) => {
                        let server_url = server_url.clone();
                        rsx! {
                            img {
                                class: "thumbnail",
                                src: thumbnail.data_url(),
                                width: "{thumbnail.width}",
                                alt: "First page of the résumé",
                                onclick: move |_| {
                                    if let Some(url) = &server_url {
                                        open_logged(url);
                                    }
                                },
                            }
                        }
                    }
                    ItemView::Rendering => rsx! { p { {RENDERING} } },
                }}
            }
            TagList { entries: resume.tag_entries() }
        }
    }
}
