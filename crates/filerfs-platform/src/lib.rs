// Contract between the filesystem adapter and the remote filer service

pub mod client;
pub mod entry;
