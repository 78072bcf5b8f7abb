//! HTTP API: job status endpoints over the shared store.

pub mod app;
pub mod config;
