//! Middleware and per-request helpers.

pub mod client_ip;
pub mod log;
pub mod recover;

pub use client_ip::{client_ip, ClientIp};
pub use log::log_request;
pub use recover::recover_panic_layer;
