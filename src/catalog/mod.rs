//! Access to the Dataverse catalog and its usage statistics
//!
//! The traversal only depends on the two traits defined here:
//!
//! - [`Catalog`] looks up dataverses (containers), their ordered contents, and
//!   datasets (members) as raw JSON documents.
//! - [`DownloadStats`] returns the cumulative download count of a dataset.
//!
//! [`DataverseClient`] implements [`Catalog`] over the Dataverse native HTTP API and
//! [`PostgresDownloadStats`] implements [`DownloadStats`] on top of the Dataverse
//! database. Both perform exactly one request per call and never retry.

mod client;
mod container;
mod download_stats;

use crate::Result;
use serde_json::Value;

pub use client::DataverseClient;
pub use container::{ChildKind, ChildRef, Container};
pub use download_stats::PostgresDownloadStats;

/// Lookups the traversal needs from the catalog.
pub trait Catalog: Send + Sync {
    /// Fetch a dataverse. `Ok(None)` means the catalog returned no payload for it.
    fn container(&self, id: &str) -> impl Future<Output = Result<Option<Container>>> + Send;

    /// Fetch the children of a dataverse in catalog-listing order.
    fn children(&self, id: &str) -> impl Future<Output = Result<Vec<ChildRef>>> + Send;

    /// Fetch the raw document of a dataset. `Ok(None)` means the dataset does not exist.
    fn member(&self, id: &str) -> impl Future<Output = Result<Option<Value>>> + Send;
}

/// Source of cumulative download counts.
pub trait DownloadStats: Send + Sync {
    fn download_count(&self, member_id: &str) -> impl Future<Output = Result<u64>> + Send;
}
