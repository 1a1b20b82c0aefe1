pub mod category;
pub mod entry;
pub mod entry_meta;
pub mod entry_tag;
pub mod tag;
