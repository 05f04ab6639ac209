// Adapters layer: concrete implementations of the ports for real I/O.

pub mod http;
pub mod storage;
