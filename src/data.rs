//! Everything a résumé item knows, independent of how it is displayed.
//!
//!  - [`resume_listing`](resume_listing): the marketplace listing and the filename/tag
//! derivations made from it.
//!
//!  - [`fetcher`](fetcher): downloads the résumé and tracks its
//! [`LoadState`](load_state::LoadState).
//!
//!  - [`thumbnail`](thumbnail): decides when the first page has to be (re)rendered.
//!
//!  - [`width_tracker`](width_tracker): the measured width the thumbnail is rendered at.
pub mod config;
pub mod error;
pub mod fetcher;
pub mod load_state;
pub mod resume_listing;
pub mod thumbnail;
pub mod ui_util;
pub mod width_tracker;
