//! Easel - image generation and editing relay server.
//!
//! Accepts images and prompts from browser survey clients, relays them to
//! third-party image providers, and archives final images to a cloud media
//! store. This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod imaging;
pub mod models;
pub mod server;
pub mod services;
