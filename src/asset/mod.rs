//! Asset selection module
//!
//! Decides which asset of a release gets downloaded for the detected
//! platform.

mod picker;

pub use picker::{AssetPicker, PlatformAssetPicker};
