//! HTTP API for the evaluation tracker

pub mod server;
pub mod views;

pub use server::{router, ApiServer, ApiServerConfig};
