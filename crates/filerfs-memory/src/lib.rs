// In-process filer implementation

pub mod filer;

pub use filer::MemoryFiler;
