//! Built-in pre- and post-processors.
//!
//! Pre-processors: [`pre::FilenameReducer`] (`filename_reducer`),
//! [`pre::StripExtension`] (`strip_extension`).
//!
//! Post-processors: [`post::FacetMapProcessor`] (`facet_map`),
//! [`post::IsoDateProcessor`] (`iso_date`), [`post::BboxProcessor`]
//! (`bbox`).

pub mod post;
pub mod pre;
