//! Diagnostics emitted while walking the catalog and building records
//!
//! Components never log on their own: they are handed an [`Observer`] when they are
//! constructed and report what happens to it as [`Event`]s. [`LogObserver`] forwards
//! events to the `log` facade, which is what the command-line tool uses.

use crate::metadata::FieldError;
use core::fmt::{Display, Formatter};
use std::sync::Arc;

const LOG_TARGET: &str = "      walk";

/// Why a container or member was left out of a report.
#[derive(Debug)]
pub enum SkipReason {
    /// The traversal was asked to visit a container without an identifier.
    MissingIdentifier,

    /// The catalog returned no payload for the container.
    EmptyContainer,

    /// The catalog returned no payload for the member.
    EmptyMember,

    /// A catalog or statistics lookup failed.
    LookupFailed(Arc<ohno::AppError>),

    /// A metadata field of the member could not be decoded.
    MalformedField(FieldError),

    /// The member document is not shaped the way Dataverse documents are.
    InvalidDocument(Arc<ohno::AppError>),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingIdentifier => write!(f, "no identifier was supplied"),
            Self::EmptyContainer => write!(f, "the container was empty"),
            Self::EmptyMember => write!(f, "the dataset was empty"),
            Self::LookupFailed(e) => write!(f, "lookup failed: {e:#}"),
            Self::MalformedField(e) => write!(f, "malformed metadata: {e}"),
            Self::InvalidDocument(e) => write!(f, "invalid dataset document: {e:#}"),
        }
    }
}

/// Something worth reporting that happened during a traversal.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    ContainerEntered {
        id: &'a str,
        name: &'a str,
        child_count: usize,
    },
    ContainerSkipped {
        id: &'a str,
        reason: &'a SkipReason,
    },
    RecordAdded {
        member: &'a str,
        container: &'a str,
        download_count: u64,
    },
    MemberSkipped {
        member: &'a str,
        container: &'a str,
        reason: &'a SkipReason,
    },
    FieldUnrecognized {
        member: &'a str,
        type_name: &'a str,
        type_class: &'a str,
    },
}

impl Display for Event<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ContainerEntered { id, name, child_count } => {
                write!(f, "Loading dataverse {id} ({name}) with {child_count} child object(s)")
            }
            Self::ContainerSkipped { id, reason } => write!(f, "Skipping dataverse {id}: {reason}"),
            Self::RecordAdded {
                member,
                container,
                download_count,
            } => write!(f, "Added dataset {member} to dataverse {container} ({download_count} download(s))"),
            Self::MemberSkipped { member, container, reason } => {
                write!(f, "Skipping dataset {member} in dataverse {container}: {reason}")
            }
            Self::FieldUnrecognized {
                member,
                type_name,
                type_class,
            } => write!(f, "Dataset {member}: field '{type_name}' has unrecognized typeClass '{type_class}', leaving it empty"),
        }
    }
}

/// Receives the diagnostics of a traversal.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &Event<'_>);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&self, event: &Event<'_>) {
        match event {
            Event::ContainerEntered { .. } | Event::RecordAdded { .. } => log::info!(target: LOG_TARGET, "{event}"),
            Event::ContainerSkipped {
                reason: SkipReason::MissingIdentifier,
                ..
            } => log::error!(target: LOG_TARGET, "{event}"),
            Event::ContainerSkipped { .. } | Event::MemberSkipped { .. } | Event::FieldUnrecognized { .. } => {
                log::warn!(target: LOG_TARGET, "{event}");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_event(&self, _event: &Event<'_>) {}
}

/// Test observer that keeps the rendered text of every event.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Observer for RecordingObserver {
    fn on_event(&self, event: &Event<'_>) {
        self.events.lock().unwrap().push(event.to_string());
    }
}
