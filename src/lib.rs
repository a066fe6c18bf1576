pub mod buffer;
pub mod config;
pub mod engine;
pub mod logger;
pub mod storage;
pub mod utils;
pub mod workload;

#[cfg(test)]
mod tests;

pub type FrameId = u32;
pub type PageId = u32;
