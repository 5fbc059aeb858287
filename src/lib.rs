//! # adad-core
//!
//! Data model and view-model logic for a Quranic verse-counting ("ʿadad")
//! reference tool.
//!
//! Counting schemes are regional conventions for how the verses of the Quran
//! are counted, organized hierarchically: a tradition and its sub-variants.
//! The remote reference API serves the scheme hierarchy as a flat list of
//! parent-referencing records together with aggregate, per-ayah, and
//! per-surah statistics. This crate turns those payloads into tree and table
//! structures a UI can render directly:
//!
//! - **[`index`]**: [`index::SchemeIndex`] — forest construction, DFS
//!   pre-order flattening, and the parent→children adjacency index, rebuilt
//!   wholesale per fetch as an immutable version.
//! - **[`selection`]**: hierarchical selection closure — selecting a scheme
//!   implies its whole ancestor chain and (by mode) its children or subtree.
//! - **[`projection`]**: display rows and DFS-ordered column descriptors for
//!   the aggregate, per-ayah, and per-surah tables.
//! - **[`service`]**: [`service::SchemeService`] — fetch, cache, index
//!   versioning, and readiness gating over a [`source::SchemeSource`].
//! - **[`export`]**: pretty JSON and RFC 4180 CSV serialization of prepared
//!   export shapes.
//!
//! ## Quick start
//!
//! Build an index from fetched records, close a selection, and project the
//! overview table:
//!
//! ```rust
//! use adad_core::index::SchemeIndex;
//! use adad_core::projection::project_aggregate;
//! use adad_core::properties::{SchemeId, SchemeRecord};
//! use adad_core::selection::Expansion;
//!
//! fn overview(records: Vec<SchemeRecord>) -> Result<(), adad_core::Error> {
//!     let index = SchemeIndex::build(&records)?;
//!     let closed = index.close_selection(&[SchemeId(2)], Expansion::DirectChildren)?;
//!     let table = project_aggregate(&index, &closed, &records);
//!     for column in &table.columns {
//!         println!("{}", column.header_text);
//!     }
//!     Ok(())
//! }
//! # overview(vec![]).unwrap();
//! ```
//!
//! With the `client` feature, [`source::HttpSchemeSource`] provides the
//! remote API binding and [`service::SchemeService`] drives the whole
//! pipeline; see the `adad` binary (`bin` feature) for an end-to-end caller.
//!
//! ## Invariants
//!
//! The flattened scheme list is DFS pre-order: every ancestor appears
//! strictly before its descendants, which is what makes "parent column
//! before child column" fall out of a plain membership filter. Selection
//! closure is idempotent and monotone, returns a fresh set, and passes
//! unknown ids through untouched. Cyclic parent chains are rejected when the
//! index is built.

pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod index;
pub mod projection;
pub mod properties;
pub mod selection;
pub mod service;
pub mod source;
#[cfg(test)]
mod tests;

pub use error::*;
