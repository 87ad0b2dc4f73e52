//! Built-in extraction methods.
//!
//! - [`RegexExtract`] (`regex`) - named-capture pattern extraction against
//!   the extraction input or the file content
//! - [`HeaderExtract`] (`header`) - named attributes or fixed-offset fields
//!   from a file's header block

pub mod header;
pub mod regex_extract;

pub use header::{HeaderExtract, HeaderOptions};
pub use regex_extract::{RegexExtract, RegexOptions, RegexTarget};
