//! Blob store adapters.

mod fs;
mod memory;

pub use fs::FileBlobStore;
pub use memory::InMemoryBlobStore;
