//! urlshortener - a URL shortener with asynchronous click analytics
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: One-shot command-line operations
//!
//! # Architecture
//! - `storage`: Link/Click repositories (SeaORM or in-memory)
//! - `services`: Shortcode assignment and link lookups
//! - `analytics`: Bounded click queue and persistence workers
//! - `monitor`: Periodic reachability probes over all links
//! - `api`: HTTP handlers and routing
//! - `config`: Configuration loading (TOML + environment)
//! - `runtime`: Startup, shutdown and execution modes
//! - `system`: Logging setup

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod monitor;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
