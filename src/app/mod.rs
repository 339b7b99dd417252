// eps2svg - app/mod.rs
//
// Application layer: run orchestration and reporting.
// Dependencies: core and platform layers.

pub mod convert;
pub mod report;
