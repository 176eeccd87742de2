//! Depth-first traversal of a dataverse tree
//!
//! [`Walker`] visits a dataverse and everything below it, turning every dataset it
//! meets into a [`FlatRecord`](crate::records::FlatRecord). Containers are visited in
//! pre-order and a container's own datasets are recorded before any dataset of its
//! sub-dataverses. Failures never abort the walk: the affected branch or dataset is
//! reported to the [`Observer`](crate::diagnostics::Observer) and skipped.

mod summary;
mod traversal;
mod walker;

pub use crate::diagnostics::SkipReason;
pub use summary::WalkSummary;
pub use traversal::Traversal;
pub use walker::Walker;
