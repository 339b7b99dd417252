// eps2svg - lib.rs
//
// Library entry point, exposing all modules for the binary and for
// integration testing.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
