#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod legacy;
pub mod memory;
pub mod rows;

pub use memory::MemoryStore;
