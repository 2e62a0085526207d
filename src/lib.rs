//! camconsole - a line-oriented text command console for a camera sensor.
//!
//! This library exposes the core modules for use by the binary and by
//! integration tests.

pub mod camera;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod host;
pub mod logging;
pub mod retry;
