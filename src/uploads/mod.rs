//! Uploads module - image storage for task attachments
//!
//! This module is split into:
//! - store: ImageStore mapping uploads to generated on-disk names
//! - handlers: HTTP handler serving stored files back

pub mod handlers;
pub mod store;

pub use handlers::configure;
pub use store::ImageStore;

#[cfg(test)]
#[path = "uploads.test.rs"]
mod uploads_test;
