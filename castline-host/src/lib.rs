//! # castline-host — screen streaming host
//!
//! Accepts exactly one viewer on each of the two channel ports, then
//! streams encoded screen frames out the AV channel and replays the
//! viewer's input events arriving on the Input channel.
//!
//! The capture source and input injector are narrow collaborator
//! seams; this binary ships a synthetic test-pattern source and a
//! tracing-based injector so the full transport can run on any
//! machine without a capture driver.

pub mod config;
pub mod inject;
pub mod service;
pub mod source;
