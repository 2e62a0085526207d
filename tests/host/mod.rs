//! Host client tests against a live console.

pub mod client_test;
