pub mod resume_item;
pub mod tag_list;
