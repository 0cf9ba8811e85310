//! crates/page_builder_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the page-builder core.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the upstream CMS backend's HTTP details.

use crate::domain::{PageSummary, PendingImage, Section, Slug};
use crate::wire::PagePayload;
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// Authentication is handled outside the core; the only assumption made here
/// is that an authenticated call either succeeds or fails with a
/// distinguishable variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Network error: {0}")]
    Network(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Fetches the persisted sections for `slug`.
    ///
    /// `Ok(None)` means the page does not exist yet, which the caller treats
    /// as an empty document; transport and server failures are `Err`.
    async fn fetch_page(&self, slug: &Slug) -> PortResult<Option<Vec<Section>>>;

    /// Summary metadata for every known page.
    async fn list_pages(&self) -> PortResult<Vec<PageSummary>>;

    /// Whole-document replace; creates the page when absent. Sections removed
    /// client-side are implicitly deleted by the replace.
    async fn upsert_page(&self, page: &PagePayload) -> PortResult<()>;
}

/// The path under which an uploaded image was persisted by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub path: String,
}

#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Uploads a staged file and returns its persisted backend path.
    async fn upload(&self, image: &PendingImage) -> PortResult<StoredImage>;
}
