//! # castline-viewer — remote screen viewer
//!
//! Connects to a castline host on both channel ports, plays back the
//! incoming video stream, and relays local input events to the host.
//!
//! The on-screen renderer and the input poller are narrow
//! collaborator seams; this binary ships a stats renderer (smoothed
//! FPS, totals, optional PPM frame snapshots) and a demo input
//! source, so the transport runs headless end to end.

pub mod config;
pub mod input_feed;
pub mod render;
pub mod service;
