//! Linkmint - a small self-hosted URL shortener service
//!
//! Core pieces:
//! - `services`: code allocation, redirect handling, health probe
//! - `storage`: repository trait, sea-orm backend, buffered click ledger
//! - `api`: HTTP handlers and route wiring
//! - `config`: TOML + environment configuration
//! - `runtime`: explicit startup sequencing and shutdown flushing

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
