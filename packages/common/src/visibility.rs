//! Read-side visibility of versioned documents.
//!
//! Authorization in this backend is binary: a requester either presented a
//! valid identity or did not. [`resolve`] turns that fact into a declarative
//! [`VisibilityFilter`] which the store applies to its queries; the filter never
//! looks at anything but a document's publication status.

use serde::Serialize;

use crate::publication_status::PublicationStatus;

/// Opaque identity supplied by the upstream authenticator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    subject: String,
}

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// Who is asking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Requester {
    Authenticated(Identity),
    Anonymous,
}

/// Inclusion predicate over a document's publication status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityFilter {
    /// Every document, whatever its status.
    All,
    /// Published documents and documents that predate versioning (no status).
    PublishedOrLegacy,
}

impl VisibilityFilter {
    /// Evaluate the filter against a single document's status.
    pub fn admits(&self, status: Option<PublicationStatus>) -> bool {
        match self {
            Self::All => true,
            Self::PublishedOrLegacy => match status {
                Some(PublicationStatus::Published) | None => true,
                Some(PublicationStatus::Draft) => false,
            },
        }
    }

    /// Render the filter as a query condition on `status_column`.
    #[cfg(feature = "sea-orm")]
    pub fn condition<C>(&self, status_column: C) -> sea_orm::Condition
    where
        C: sea_orm::ColumnTrait,
    {
        use sea_orm::Condition;

        match self {
            // An empty conjunction is always true.
            Self::All => Condition::all(),
            Self::PublishedOrLegacy => Condition::any()
                .add(status_column.eq(PublicationStatus::Published.as_str()))
                .add(status_column.is_null()),
        }
    }
}

/// Decide which documents `requester` may read.
pub fn resolve(requester: &Requester) -> VisibilityFilter {
    match requester {
        Requester::Authenticated(_) => VisibilityFilter::All,
        Requester::Anonymous => VisibilityFilter::PublishedOrLegacy,
    }
}

/// Gate for the admin surface itself, independent of per-document filtering.
///
/// Anyone who reached the admin surface with an identity may enter it.
pub fn can_enter_admin(_identity: &Identity) -> bool {
    true
}
