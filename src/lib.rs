pub mod application;
pub mod archive;
pub mod asset;
pub mod cleanup;
pub mod download;
pub mod error;
pub mod github;
pub mod http;
pub mod platform;
pub mod progress;
pub mod runtime;
