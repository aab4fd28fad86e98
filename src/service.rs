//! Collaborators outside the UI: the marketplace document service and the PDF engine.
pub mod marketplace;
pub mod render_worker;
