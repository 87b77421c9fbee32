//! HTTP API for property listings: configuration, routing, and
//! request/response mapping.

pub mod app;
pub mod config;
