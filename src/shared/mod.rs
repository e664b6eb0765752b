//! Cross-cutting support types

pub mod shutdown;

pub use shutdown::ShutdownSignal;
