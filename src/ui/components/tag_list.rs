use crate::data::resume_listing::TagEntry;
use dioxus::prelude::*;

pub const NO_TAGS: &str = "No tags";

/// What a tag list shows for a set of entries.
#[derive(Debug, PartialEq, Eq)]
pub enum TagListView<'a> {
    Placeholder,
    Chips(&'a [TagEntry]),
}

pub fn tag_list_view(entries: &[TagEntry]) -> TagListView<'_> {
    if entries.is_empty() {
        TagListView::Placeholder
    } else {
        TagListView::Chips(entries)
    }
}

#[component]
pub fn TagList(entries: Vec<TagEntry>) -> Element {
    rsx! {
        div {
            class: "tags",
            {match tag_list_view(&entries) {
                TagListView::Placeholder => rsx! { p { {NO_TAGS} } },
                TagListView::Chips(chips) => rsx! {
                    for entry in chips.iter() {
                        Tag { key: "{entry.key}", tag: entry.label.clone() }
                    }
                },
            }}
        }
    }
}

#[component]
fn Tag(tag: String) -> Element {
    rsx! {
        span {
            class: "tag",
            "{tag}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::resume_listing::ResumeListing;

    fn tags(tags: &[&str]) -> Vec<TagEntry> {
        ResumeListing::new(
            "64f1",
            vec!["resumes/cv.pdf".into()],
            tags.iter().map(|s| s.to_string()).collect(),
        )
        .tag_entries()
    }

    #[test]
    fn should_show_placeholder_without_tags() {
        assert_eq!(tag_list_view(&tags(&[])), TagListView::Placeholder);
    }

    #[test]
    fn should_show_one_chip_per_tag() {
        let entries = tags(&["rust", "backend", "rust", "rust#1"]);
        match tag_list_view(&entries) {
            TagListView::Chips(chips) => {
                assert_eq!(chips.len(), 4);
                let labels: Vec<&str> = chips.iter().map(|c| c.label.as_str()).collect();
                assert_eq!(labels, ["rust", "backend", "rust", "rust#1"]);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }
}
