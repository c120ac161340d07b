//! Device command client
//!
//! Sends exactly one command to exactly one light per call. Holds no state
//! between calls beyond the driver handle and the timeout bound.

mod client;
#[cfg(test)]
pub(crate) mod fake;

pub use client::DeviceClient;
