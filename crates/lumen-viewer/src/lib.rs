//! Lumen Viewer
//!
//! Drives the script engine for a page: runs inline scripts in document
//! order, exposes the refresh signal to the renderer, and turns clicks on
//! rendered regions into `click` events.
//!
//! # Example
//! ```rust,ignore
//! use lumen_viewer::{Page, Config};
//!
//! let mut page = Page::new(document, Config::default());
//! let report = page.run_scripts()?;
//! if page.take_refresh() {
//!     // re-layout and repaint
//! }
//! ```

mod config;
mod error;
mod hit;
mod page;

pub use config::Config;
pub use error::ViewerError;
pub use hit::{HitRegion, hit_test};
pub use page::{Page, ScriptReport};

/// Viewer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
