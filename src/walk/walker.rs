use super::{Traversal, WalkSummary};
use crate::Result;
use crate::catalog::{Catalog, ChildKind, Container, DownloadStats};
use crate::diagnostics::{Event, Observer, SkipReason};
use crate::records::{FlatRecord, RecordEnricher, file_sizes};
use core::pin::Pin;
use ohno::bail;
use serde_json::Value;
use std::sync::Arc;

type VisitFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Walks dataverse trees and collects one record per dataset.
pub struct Walker<C, S> {
    catalog: C,
    stats: S,
    enricher: RecordEnricher,
    observer: Arc<dyn Observer>,
    traversal: Traversal,
}

impl<C: core::fmt::Debug, S: core::fmt::Debug> core::fmt::Debug for Walker<C, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Walker")
            .field("catalog", &self.catalog)
            .field("stats", &self.stats)
            .field("observer", &"<dyn Observer>")
            .field("traversal", &self.traversal)
            .finish_non_exhaustive()
    }
}

impl<C: Catalog, S: DownloadStats> Walker<C, S> {
    #[must_use]
    pub fn new(catalog: C, stats: S, observer: Arc<dyn Observer>) -> Self {
        Self {
            catalog,
            stats,
            enricher: RecordEnricher::new(Arc::clone(&observer)),
            observer,
            traversal: Traversal::default(),
        }
    }

    #[must_use]
    pub const fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    #[must_use]
    pub const fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Walk the dataverse `container_id` and everything below it, appending one record per
    /// dataset to `records`.
    ///
    /// Records already in `records` are left alone. Dataverses and datasets that cannot be
    /// loaded are reported to the observer, skipped, and counted in the returned summary.
    ///
    /// # Errors
    ///
    /// Fails only when `container_id` is empty, in which case `records` is untouched.
    pub async fn walk(&self, records: &mut Vec<FlatRecord>, container_id: &str) -> Result<WalkSummary> {
        if container_id.is_empty() {
            self.observer.on_event(&Event::ContainerSkipped {
                id: container_id,
                reason: &SkipReason::MissingIdentifier,
            });
            bail!("a dataverse identifier is required to walk the catalog");
        }

        let mut summary = WalkSummary::default();
        match self.traversal {
            Traversal::Recursive => self.walk_recursive(records, container_id.to_string(), &mut summary).await,
            Traversal::Iterative => self.walk_iterative(records, container_id, &mut summary).await,
        }

        Ok(summary)
    }

    fn walk_recursive<'a>(
        &'a self,
        records: &'a mut Vec<FlatRecord>,
        container_id: String,
        summary: &'a mut WalkSummary,
    ) -> VisitFuture<'a> {
        Box::pin(async move {
            let Some(sub_containers) = self.visit(records, &container_id, summary).await else {
                return;
            };

            for sub_container in sub_containers {
                self.walk_recursive(records, sub_container, summary).await;
            }
        })
    }

    async fn walk_iterative(&self, records: &mut Vec<FlatRecord>, root_id: &str, summary: &mut WalkSummary) {
        let mut pending = vec![root_id.to_string()];

        while let Some(container_id) = pending.pop() {
            if let Some(sub_containers) = self.visit(records, &container_id, summary).await {
                // reversed so the first sub-container is popped next
                pending.extend(sub_containers.into_iter().rev());
            }
        }
    }

    /// Record the datasets of one dataverse and return its sub-dataverses in listing order.
    ///
    /// Returns `None` when the dataverse itself had to be skipped.
    async fn visit(&self, records: &mut Vec<FlatRecord>, container_id: &str, summary: &mut WalkSummary) -> Option<Vec<String>> {
        let container = match self.catalog.container(container_id).await {
            Ok(Some(container)) => container,
            Ok(None) => {
                self.skip_container(container_id, &SkipReason::EmptyContainer, summary);
                return None;
            }
            Err(e) => {
                self.skip_container(container_id, &lookup_failed(e), summary);
                return None;
            }
        };

        let children = match self.catalog.children(container_id).await {
            Ok(children) => children,
            Err(e) => {
                self.skip_container(container_id, &lookup_failed(e), summary);
                return None;
            }
        };

        summary.containers_visited += 1;
        self.observer.on_event(&Event::ContainerEntered {
            id: container_id,
            name: &container.name,
            child_count: children.len(),
        });

        let mut sub_containers = Vec::new();
        for child in children {
            match child.kind {
                ChildKind::Member => self.add_member(records, &container, &child.id, summary).await,
                ChildKind::Container if child.id.is_empty() => {
                    self.skip_container(&child.id, &SkipReason::MissingIdentifier, summary);
                }
                ChildKind::Container => sub_containers.push(child.id),
                ChildKind::Other => {}
            }
        }

        Some(sub_containers)
    }

    async fn add_member(&self, records: &mut Vec<FlatRecord>, container: &Container, member_id: &str, summary: &mut WalkSummary) {
        match self.build_record(container, member_id).await {
            Ok((record, download_count)) => {
                records.push(record);
                summary.records_added += 1;
                self.observer.on_event(&Event::RecordAdded {
                    member: member_id,
                    container: &container.alias,
                    download_count,
                });
            }
            Err(reason) => {
                summary.members_skipped += 1;
                self.observer.on_event(&Event::MemberSkipped {
                    member: member_id,
                    container: &container.alias,
                    reason: &reason,
                });
            }
        }
    }

    async fn build_record(&self, container: &Container, member_id: &str) -> Result<(FlatRecord, u64), SkipReason> {
        if member_id.is_empty() {
            return Err(SkipReason::MissingIdentifier);
        }

        let raw_member = self
            .catalog
            .member(member_id)
            .await
            .map_err(lookup_failed)?
            .ok_or(SkipReason::EmptyMember)?;

        if !raw_member.get("data").is_some_and(Value::is_object) {
            return Err(SkipReason::EmptyMember);
        }

        let download_count = self.stats.download_count(member_id).await.map_err(lookup_failed)?;
        let sizes = file_sizes(&raw_member).map_err(|e| SkipReason::InvalidDocument(Arc::new(e)))?;

        let record = self
            .enricher
            .enrich(&raw_member, &container.alias, download_count, &sizes)
            .map_err(SkipReason::MalformedField)?
            .ok_or(SkipReason::EmptyMember)?;

        Ok((record, download_count))
    }

    fn skip_container(&self, container_id: &str, reason: &SkipReason, summary: &mut WalkSummary) {
        summary.containers_skipped += 1;
        self.observer.on_event(&Event::ContainerSkipped { id: container_id, reason });
    }
}

fn lookup_failed(e: ohno::AppError) -> SkipReason {
    SkipReason::LookupFailed(Arc::new(e))
}
