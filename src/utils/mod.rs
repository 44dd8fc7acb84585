// src/utils/mod.rs

//! Utility functions and helpers.

pub mod lang;
pub mod url;

pub use lang::{Script, dominant_script};
pub use url::{page_url, resolve_href, same_document};
