mod error;
mod model;
mod traits;

pub mod memory;

pub use error::ContentStoreError;
pub use memory::MemoryContentStore;
pub use model::{
    Category, CategoryId, Entry, EntryFilter, EntryId, EntryStatus, META_FILE_NAME,
    META_UPLOAD_DIRECTORY, NewEntry,
};
pub use traits::ContentStore;
