//! Shared test helpers: socket availability guards and log capture.

pub mod logging;
pub mod socket_guard;
