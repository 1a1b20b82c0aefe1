pub mod archive;
pub mod config;
pub mod content;
pub mod filename;
pub mod naming;
pub mod publisher;
pub mod synonym;
pub mod uploader;

pub use naming::ArchiveName;
pub use uploader::{UploadError, UploadReport, UploadedArchive, Uploader};
