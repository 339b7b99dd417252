// eps2svg - core/mod.rs
//
// Core business logic layer: data model, discovery, path mapping.
// Must NOT depend on: platform or app.

pub mod discovery;
pub mod mapping;
pub mod model;
