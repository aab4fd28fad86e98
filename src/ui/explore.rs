use crate::ui::components::resume_item::ResumeItem;
use crate::ui::UIData;
use dioxus::prelude::*;

/// Lists every résumé on the marketplace.
#[component]
pub fn ExplorePage(ui_data: UIData) -> Element {
    use_context_provider(|| ui_data.services.clone());

    rsx! {
        h1 { "Explore" }
        if ui_data.listings.is_empty() {
            i { "No resumes to explore" }
        }
        div {
            class: "resume-grid",
            for listing in ui_data.listings.iter() {
                ResumeItem { key: "{listing.id}", resume: listing.clone() }
            }
        }
    }
}
