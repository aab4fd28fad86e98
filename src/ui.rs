pub mod components;
pub mod explore;

use crate::data::resume_listing::ResumeListing;
use crate::data::thumbnail::ThumbnailRenderer;
use crate::service::marketplace::DocumentService;
use std::sync::Arc;

/// The collaborators every résumé item needs, provided as context by the Explore page.
/// Can be cloned cheaply.
#[derive(Clone)]
pub struct ResumeServices {
    pub documents: Arc<dyn DocumentService>,
    pub renderer: Arc<dyn ThumbnailRenderer>,
}

impl PartialEq for ResumeServices {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.documents, &other.documents) && Arc::ptr_eq(&self.renderer, &other.renderer)
    }
}

/// Everything the UI is launched with, built once in main.
#[derive(Clone, PartialEq)]
pub struct UIData {
    pub services: ResumeServices,
    pub listings: Arc<Vec<ResumeListing>>,
}

impl UIData {
    pub fn new(services: ResumeServices, listings: Vec<ResumeListing>) -> Self {
        Self {
            services,
            listings: Arc::new(listings),
        }
    }
}
