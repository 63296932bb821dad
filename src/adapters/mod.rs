//! Adapters - concrete implementations of the ports.

pub mod console;
pub mod http;
pub mod storage;
