pub mod archive_writer;

pub use archive_writer::{read_collection, read_metadata, ArchiveWriter};
