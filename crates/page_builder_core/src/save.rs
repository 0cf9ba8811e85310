//! crates/page_builder_core/src/save.rs
//!
//! The save pipeline: turns an in-memory document snapshot into a
//! backend-safe payload and submits it as one whole-document replace.
//!
//! Order of operations is load-bearing. Validation runs before any upload so
//! an unsubmittable document never orphans uploaded files; uploads for
//! distinct sections run concurrently but the submit is only issued after
//! every upload has succeeded. The first failure of any step aborts the save
//! and the caller's in-memory document stays exactly as the user left it.

use crate::domain::{DocumentSnapshot, ImageRef, SectionId};
use crate::ports::{ImageUploader, PageRepository, PortError};
use crate::schema::{self, FieldError};
use crate::wire::{PagePayload, WireSection};
use futures::future;
use std::sync::Arc;

//=========================================================================================
// Errors
//=========================================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SaveError {
    #[error("no document is loaded")]
    NoDocument,
    /// A section failed its template's schema; nothing was uploaded or
    /// submitted.
    #[error("section {section} failed validation")]
    Validation {
        section: SectionId,
        errors: Vec<FieldError>,
    },
    /// One section's staged image could not be persisted; the save was
    /// aborted before submit.
    #[error("image upload failed for section {section}: {source}")]
    Upload {
        section: SectionId,
        source: PortError,
    },
    /// Every upload succeeded but the final document replace did not. The
    /// upsert is whole-document, so nothing partial was persisted.
    #[error("document submit failed: {source}")]
    Submit { source: PortError },
}

//=========================================================================================
// The pipeline
//=========================================================================================

pub struct SavePipeline {
    uploader: Arc<dyn ImageUploader>,
    repo: Arc<dyn PageRepository>,
}

impl SavePipeline {
    pub fn new(uploader: Arc<dyn ImageUploader>, repo: Arc<dyn PageRepository>) -> Self {
        Self { uploader, repo }
    }

    /// Resolves every staged image, encodes the document for the wire and
    /// submits it. Returns the payload that was persisted so the caller can
    /// reload canonical state.
    pub async fn save(&self, snapshot: DocumentSnapshot) -> Result<PagePayload, SaveError> {
        let slug = snapshot.slug.ok_or(SaveError::NoDocument)?;
        let mut sections = snapshot.sections;

        // Gate on schema validity before any network call.
        for section in &sections {
            if let Err(errors) = schema::validate(&section.body) {
                return Err(SaveError::Validation {
                    section: section.id.clone(),
                    errors,
                });
            }
        }

        // Resolve staged images concurrently; the first failure cancels the
        // remaining uploads and the save.
        let uploads = sections
            .iter()
            .filter_map(|section| {
                let pending = section.body.image().and_then(ImageRef::pending)?;
                let id = section.id.clone();
                let pending = pending.clone();
                let uploader = Arc::clone(&self.uploader);
                Some(async move {
                    match uploader.upload(&pending).await {
                        Ok(stored) => Ok((id, stored.path)),
                        Err(source) => Err(SaveError::Upload {
                            section: id,
                            source,
                        }),
                    }
                })
            })
            .collect::<Vec<_>>();
        let resolved = future::try_join_all(uploads).await?;

        for (id, path) in resolved {
            if let Some(slot) = sections
                .iter_mut()
                .find(|section| section.id == id)
                .and_then(|section| section.body.image_mut())
            {
                *slot = ImageRef::Persisted(path);
            }
        }

        // Every image is persisted now, so encoding cannot observe a staged
        // file; the error arm exists only to avoid an unwrap.
        let wire_sections = sections
            .iter()
            .map(WireSection::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| SaveError::Upload {
                section: err.section,
                source: PortError::Unexpected("staged image left unresolved".into()),
            })?;

        let payload = PagePayload {
            slug,
            sections: wire_sections,
        };
        self.repo
            .upsert_page(&payload)
            .await
            .map_err(|source| SaveError::Submit { source })?;
        Ok(payload)
    }
}
