// Adapters layer: concrete implementations of the domain ports.

pub mod rest_sink;
pub mod storage;

pub use rest_sink::RestLogSink;
pub use storage::LocalStorage;
