//! Console session tests.

pub mod binary_test;
pub mod common;
pub mod dispatch_test;
pub mod quoting_test;
