//! Source-text extraction for the Polished Crystal data tree.
//!
//! Every source file is first split into its Polished and Faithful line
//! streams ([`split`]), classified once into [`line::Line`] events, and then
//! walked by a per-domain extractor. Extractors never touch the filesystem
//! (apart from the curated YAML overlay) and never fail: anything they cannot
//! read becomes a [`polished_dex_core::Diagnostic`].

pub mod abilities;
pub mod curated;
pub mod cursor;
pub mod error;
pub mod events;
pub mod evos;
pub mod items;
pub mod line;
pub mod locations;
pub mod marts;
pub mod moves;
pub mod species;
pub mod split;
pub mod statics;
pub mod stats;
pub mod text;
pub mod trainers;

pub use cursor::LineCursor;
pub use error::ExtractError;
pub use line::{Directive, Line, classify_all};
pub use split::{SplitOptions, SplitSource, split_strict, split_variants};
