// eps2svg - platform/mod.rs
//
// Platform abstraction layer: config directories and the external converter.
// Must NOT depend on: app.

pub mod config;
pub mod converter;
