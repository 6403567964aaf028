//! HTML handling for webgrab
//!
//! Link extraction for mirror mode and the in-place link rewrite for saved
//! documents.

pub mod extract;
pub mod rewrite;

pub use extract::extract_links;
pub use rewrite::rewrite_links;
