//! Common test infrastructure for Easel integration tests.
//!
//! Each test file compiles its own copy of this module, so items may appear
//! unused from the perspective of a single test file even though they're
//! used elsewhere.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod app;
pub mod fixtures;
pub mod providers;

pub use app::{test_secrets, MultipartBuilder, TestApp, TestResponse};
pub use fixtures::*;
pub use providers::MockProviders;
