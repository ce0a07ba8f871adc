//! Snaplink - a small URL shortener core
//!
//! Keeps shortened URLs in an in-memory registry mirrored into a durable
//! slot store, enforces a cap on simultaneously active links, soft-expires
//! links on a timer and records clicks with privacy-masked visitor data.
//!
//! # Architecture
//! - `validation`: URL, short-code and expiry rules
//! - `event_log`: bounded, persisted log of notable actions
//! - `storage`: slot store backends and the persisted record types
//! - `registry`: the link registry and its background expiry sweeper
//! - `services`: form/redirect/dashboard façade over the registry
//! - `config`: configuration management
//! - `system`: tracing initialisation

pub mod clock;
pub mod config;
pub mod errors;
pub mod event_log;
pub mod registry;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
pub mod validation;
