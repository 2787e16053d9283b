//! Site context assembly for Lectern.
//!
//! This crate provides:
//! - [`SiteContext`]: the read-only record handed to the rendering pipeline
//! - Navigation tree building for UI presentation
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use lectern_config::Config;
//! use lectern_site::SiteContext;
//!
//! let config = Config::load(None)?;
//! let context = SiteContext::build(&config)?;
//!
//! // The context is immutable from here on; the renderer only reads it.
//! assert!(!context.title.is_empty());
//! # Ok(())
//! # }
//! ```

mod context;
mod nav;

pub use context::{BuildContext, ContextError, OpenGraph, SiteContext, ThemeContext};
pub use nav::{NavItem, nav_tree};
