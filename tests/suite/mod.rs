//! Integration test suite
//!
//! Each submodule drives the real router over HTTP.

mod api;
mod scenarios;
