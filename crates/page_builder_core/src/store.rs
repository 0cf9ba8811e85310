//! crates/page_builder_core/src/store.rs
//!
//! The in-memory document store for one edit session: the single source of
//! truth for the page being edited. One store instance is owned by exactly
//! one session; callers on multi-threaded runtimes serialize access to it
//! (the service keeps each store behind its session's mutex), which preserves
//! last-write-wins-per-id semantics without any locking in here.

use crate::domain::{
    DocumentSnapshot, ImageRef, PendingImage, Section, SectionBody, SectionId, Slug, TemplateId,
};
use crate::ports::{PageRepository, PortResult};
use crate::schema;
use std::sync::Arc;

//=========================================================================================
// Errors
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no document is loaded")]
    NoDocument,
    #[error("no section with id {0}")]
    SectionNotFound(SectionId),
    #[error("section {id} is {actual}, not {requested}; templates are immutable")]
    TemplateMismatch {
        id: SectionId,
        actual: TemplateId,
        requested: TemplateId,
    },
    #[error("{0} has no image field")]
    NoImageField(TemplateId),
}

//=========================================================================================
// The store
//=========================================================================================

struct EditablePage {
    slug: Slug,
    sections: Vec<Section>,
}

/// The document under edit. Constructed per session with an injected
/// repository; `load`/`list_pages` are the only operations that touch the
/// network, every mutation is synchronous and id-routed.
pub struct DocumentStore {
    repo: Arc<dyn PageRepository>,
    page: Option<EditablePage>,
}

impl DocumentStore {
    pub fn new(repo: Arc<dyn PageRepository>) -> Self {
        Self { repo, page: None }
    }

    //-------------------------------------------------------------------------------------
    // Reads
    //-------------------------------------------------------------------------------------

    pub fn slug(&self) -> Option<&Slug> {
        self.page.as_ref().map(|page| &page.slug)
    }

    pub fn sections(&self) -> &[Section] {
        self.page.as_ref().map_or(&[], |page| page.sections.as_slice())
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections().iter().find(|section| &section.id == id)
    }

    /// Deep copy of the current document for the save pipeline. After
    /// `reset()` this is an empty-sections document with no slug.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            slug: self.slug().cloned(),
            sections: self.sections().to_vec(),
        }
    }

    //-------------------------------------------------------------------------------------
    // Network-bound operations
    //-------------------------------------------------------------------------------------

    /// Fetches the persisted document for `slug` and replaces the in-memory
    /// one. A page the backend does not know yet becomes an empty document
    /// scoped to the slug. On error the prior in-memory state is untouched.
    pub async fn load(&mut self, slug: &Slug) -> PortResult<()> {
        let sections = self.repo.fetch_page(slug).await?.unwrap_or_default();
        self.page = Some(EditablePage {
            slug: slug.clone(),
            sections,
        });
        Ok(())
    }

    /// Directory metadata for all known pages; the loaded document (if any)
    /// is not affected.
    pub async fn list_pages(&self) -> PortResult<Vec<crate::domain::PageSummary>> {
        self.repo.list_pages().await
    }

    //-------------------------------------------------------------------------------------
    // Section mutations (id-routed, synchronous)
    //-------------------------------------------------------------------------------------

    /// Whole-body replace of one section's data, last write wins. The body
    /// must carry the section's own template; no other section is touched.
    pub fn replace_section_data(
        &mut self,
        id: &SectionId,
        body: SectionBody,
    ) -> Result<(), StoreError> {
        let section = self.section_mut(id)?;
        if section.template() != body.template() {
            return Err(StoreError::TemplateMismatch {
                id: id.clone(),
                actual: section.template(),
                requested: body.template(),
            });
        }
        section.body = body;
        Ok(())
    }

    /// Appends a new section with a fresh stable id and the template's
    /// default body; returns the id so the editor can focus it.
    pub fn add_section(&mut self, template: TemplateId) -> Result<SectionId, StoreError> {
        let page = self.page.as_mut().ok_or(StoreError::NoDocument)?;
        let section = Section {
            id: SectionId::generate(),
            body: schema::default_body(template),
        };
        let id = section.id.clone();
        page.sections.push(section);
        Ok(id)
    }

    pub fn remove_section(&mut self, id: &SectionId) -> Result<(), StoreError> {
        let page = self.page.as_mut().ok_or(StoreError::NoDocument)?;
        let index = page
            .sections
            .iter()
            .position(|section| &section.id == id)
            .ok_or_else(|| StoreError::SectionNotFound(id.clone()))?;
        page.sections.remove(index);
        Ok(())
    }

    /// Moves a section to `to_index` (clamped to the end), preserving the
    /// relative order of everything else.
    pub fn move_section(&mut self, id: &SectionId, to_index: usize) -> Result<(), StoreError> {
        let page = self.page.as_mut().ok_or(StoreError::NoDocument)?;
        let from = page
            .sections
            .iter()
            .position(|section| &section.id == id)
            .ok_or_else(|| StoreError::SectionNotFound(id.clone()))?;
        let section = page.sections.remove(from);
        let to = to_index.min(page.sections.len());
        page.sections.insert(to, section);
        Ok(())
    }

    /// Stages a local file into a section's image slot. Purely in-memory
    /// until save; nothing is uploaded here.
    pub fn stage_image(&mut self, id: &SectionId, image: PendingImage) -> Result<(), StoreError> {
        let section = self.section_mut(id)?;
        let template = section.template();
        let slot = section
            .body
            .image_mut()
            .ok_or(StoreError::NoImageField(template))?;
        *slot = ImageRef::Pending(image);
        Ok(())
    }

    /// Clears a section's image slot entirely (both persisted and staged).
    pub fn clear_image(&mut self, id: &SectionId) -> Result<(), StoreError> {
        let section = self.section_mut(id)?;
        let template = section.template();
        let slot = section
            .body
            .image_mut()
            .ok_or(StoreError::NoImageField(template))?;
        *slot = ImageRef::Empty;
        Ok(())
    }

    /// Back to the uninitialized state; nothing from this session can leak
    /// into the next one.
    pub fn reset(&mut self) {
        self.page = None;
    }

    fn section_mut(&mut self, id: &SectionId) -> Result<&mut Section, StoreError> {
        let page = self.page.as_mut().ok_or(StoreError::NoDocument)?;
        page.sections
            .iter_mut()
            .find(|section| &section.id == id)
            .ok_or_else(|| StoreError::SectionNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PageSummary, Paragraph, ParagraphGroup, RichTextData, StepData};
    use crate::ports::{PageRepository, PortError, PortResult};
    use crate::wire::PagePayload;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory backend double. `fail` flips every call into a network error.
    #[derive(Default)]
    struct StubBackend {
        pages: Mutex<HashMap<String, Vec<Section>>>,
        fail: Mutex<bool>,
    }

    impl StubBackend {
        fn with_page(slug: &str, sections: Vec<Section>) -> Arc<Self> {
            let backend = Self::default();
            backend.pages.lock().unwrap().insert(slug.to_owned(), sections);
            Arc::new(backend)
        }

        fn set_failing(&self, failing: bool) {
            *self.fail.lock().unwrap() = failing;
        }
    }

    #[async_trait]
    impl PageRepository for StubBackend {
        async fn fetch_page(&self, slug: &Slug) -> PortResult<Option<Vec<Section>>> {
            if *self.fail.lock().unwrap() {
                return Err(PortError::Network("connection refused".into()));
            }
            Ok(self.pages.lock().unwrap().get(slug.as_str()).cloned())
        }

        async fn list_pages(&self) -> PortResult<Vec<PageSummary>> {
            let pages = self.pages.lock().unwrap();
            Ok(pages
                .iter()
                .map(|(slug, sections)| PageSummary {
                    slug: Slug::new(slug.clone()).unwrap(),
                    section_count: sections.len(),
                    updated_at: None,
                })
                .collect())
        }

        async fn upsert_page(&self, _page: &PagePayload) -> PortResult<()> {
            Ok(())
        }
    }

    fn step_section(id: &str, heading: &str) -> Section {
        Section {
            id: SectionId::new(id),
            body: SectionBody::Step(StepData {
                step_number: "01".into(),
                heading: heading.into(),
                description: ParagraphGroup {
                    paragraphs: vec![Paragraph {
                        id: 1,
                        content: "x".into(),
                    }],
                },
                image: ImageRef::Persisted("/img/a.png".into()),
            }),
        }
    }

    fn rich_text_section(id: &str, heading: &str) -> Section {
        Section {
            id: SectionId::new(id),
            body: SectionBody::RichText(RichTextData {
                heading: heading.into(),
                body: ParagraphGroup::seeded(1),
            }),
        }
    }

    fn slug(value: &str) -> Slug {
        Slug::new(value).unwrap()
    }

    #[tokio::test]
    async fn load_replaces_document_identity_and_sections() {
        let backend = StubBackend::with_page("pricing", vec![step_section("s1", "Pick a plan")]);
        let mut store = DocumentStore::new(backend);

        store.load(&slug("pricing")).await.unwrap();
        assert_eq!(store.slug(), Some(&slug("pricing")));
        assert_eq!(store.sections().len(), 1);
        assert_eq!(store.sections()[0].id.as_str(), "s1");
    }

    #[tokio::test]
    async fn loading_an_unknown_slug_initializes_an_empty_document() {
        let backend = Arc::new(StubBackend::default());
        let mut store = DocumentStore::new(backend);

        store.load(&slug("brand-new")).await.unwrap();
        assert_eq!(store.slug(), Some(&slug("brand-new")));
        assert!(store.sections().is_empty());
    }

    #[tokio::test]
    async fn failed_load_leaves_prior_state_untouched() {
        let backend = StubBackend::with_page("pricing", vec![step_section("s1", "Pick a plan")]);
        let mut store = DocumentStore::new(backend.clone());
        store.load(&slug("pricing")).await.unwrap();

        backend.set_failing(true);
        let err = store.load(&slug("other")).await.unwrap_err();
        assert!(matches!(err, PortError::Network(_)));
        assert_eq!(store.slug(), Some(&slug("pricing")));
        assert_eq!(store.sections().len(), 1);
    }

    #[tokio::test]
    async fn replace_routes_by_id_and_leaves_order_and_neighbors_alone() {
        let backend = StubBackend::with_page(
            "about",
            vec![rich_text_section("a", "first"), rich_text_section("b", "second")],
        );
        let mut store = DocumentStore::new(backend);
        store.load(&slug("about")).await.unwrap();

        let new_body = SectionBody::RichText(RichTextData {
            heading: "second, edited".into(),
            body: ParagraphGroup::seeded(1),
        });
        store
            .replace_section_data(&SectionId::new("b"), new_body.clone())
            .unwrap();

        assert_eq!(store.sections()[0], rich_text_section("a", "first"));
        assert_eq!(store.sections()[1].id.as_str(), "b");
        assert_eq!(store.sections()[1].body, new_body);
    }

    #[tokio::test]
    async fn replace_is_idempotent() {
        let backend = StubBackend::with_page("about", vec![rich_text_section("a", "first")]);
        let mut store = DocumentStore::new(backend);
        store.load(&slug("about")).await.unwrap();

        let body = SectionBody::RichText(RichTextData {
            heading: "edited".into(),
            body: ParagraphGroup::seeded(1),
        });
        store.replace_section_data(&SectionId::new("a"), body.clone()).unwrap();
        let once = store.snapshot();
        store.replace_section_data(&SectionId::new("a"), body).unwrap();
        assert_eq!(store.snapshot(), once);
    }

    #[tokio::test]
    async fn replace_with_unknown_id_touches_nothing() {
        let backend = StubBackend::with_page("about", vec![rich_text_section("a", "first")]);
        let mut store = DocumentStore::new(backend);
        store.load(&slug("about")).await.unwrap();
        let before = store.snapshot();

        let err = store
            .replace_section_data(
                &SectionId::new("ghost"),
                SectionBody::RichText(RichTextData::default()),
            )
            .unwrap_err();
        assert_eq!(err, StoreError::SectionNotFound(SectionId::new("ghost")));
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn replace_rejects_a_template_change() {
        let backend = StubBackend::with_page("about", vec![rich_text_section("a", "first")]);
        let mut store = DocumentStore::new(backend);
        store.load(&slug("about")).await.unwrap();

        let err = store
            .replace_section_data(&SectionId::new("a"), schema::default_body(TemplateId::Template5))
            .unwrap_err();
        assert!(matches!(err, StoreError::TemplateMismatch { .. }));
        // The section still carries its original template and data.
        assert_eq!(store.sections()[0], rich_text_section("a", "first"));
    }

    #[tokio::test]
    async fn add_remove_and_move_keep_ids_stable() {
        let backend = Arc::new(StubBackend::default());
        let mut store = DocumentStore::new(backend);
        store.load(&slug("landing")).await.unwrap();

        let first = store.add_section(TemplateId::Template1).unwrap();
        let second = store.add_section(TemplateId::Template3).unwrap();
        let third = store.add_section(TemplateId::Template5).unwrap();
        assert_ne!(first, second);

        store.move_section(&third, 0).unwrap();
        let order: Vec<&SectionId> = store.sections().iter().map(|s| &s.id).collect();
        assert_eq!(order, vec![&third, &first, &second]);

        store.remove_section(&first).unwrap();
        assert_eq!(store.sections().len(), 2);
        assert!(store.section(&first).is_none());
        assert!(store.section(&second).is_some());
    }

    #[tokio::test]
    async fn move_clamps_past_the_end() {
        let backend = Arc::new(StubBackend::default());
        let mut store = DocumentStore::new(backend);
        store.load(&slug("landing")).await.unwrap();
        let first = store.add_section(TemplateId::Template1).unwrap();
        let second = store.add_section(TemplateId::Template3).unwrap();

        store.move_section(&first, 99).unwrap();
        let order: Vec<&SectionId> = store.sections().iter().map(|s| &s.id).collect();
        assert_eq!(order, vec![&second, &first]);
    }

    #[tokio::test]
    async fn staging_an_image_is_local_and_typed() {
        let backend = Arc::new(StubBackend::default());
        let mut store = DocumentStore::new(backend);
        store.load(&slug("landing")).await.unwrap();
        let hero = store.add_section(TemplateId::Template1).unwrap();
        let text = store.add_section(TemplateId::Template3).unwrap();

        let staged = PendingImage {
            file_name: "hero.png".into(),
            content_type: "image/png".into(),
            bytes: bytes::Bytes::from_static(b"png"),
        };
        store.stage_image(&hero, staged.clone()).unwrap();
        assert!(store.section(&hero).unwrap().body.image().unwrap().is_pending());

        let err = store.stage_image(&text, staged).unwrap_err();
        assert_eq!(err, StoreError::NoImageField(TemplateId::Template3));

        store.clear_image(&hero).unwrap();
        assert_eq!(store.section(&hero).unwrap().body.image(), Some(&ImageRef::Empty));
    }

    #[tokio::test]
    async fn reset_guarantees_no_leakage_across_sessions() {
        let backend = StubBackend::with_page("pricing", vec![step_section("s1", "Pick a plan")]);
        let mut store = DocumentStore::new(backend.clone());
        store.load(&slug("pricing")).await.unwrap();

        store.reset();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.slug, None);
        assert!(snapshot.sections.is_empty());

        backend
            .pages
            .lock()
            .unwrap()
            .insert("other".into(), vec![rich_text_section("r1", "About us")]);
        store.load(&slug("other")).await.unwrap();
        assert!(store.section(&SectionId::new("s1")).is_none());
        assert_eq!(store.sections().len(), 1);
    }

    #[tokio::test]
    async fn mutations_without_a_document_are_rejected() {
        let backend = Arc::new(StubBackend::default());
        let mut store = DocumentStore::new(backend);
        assert_eq!(
            store.add_section(TemplateId::Template1).unwrap_err(),
            StoreError::NoDocument
        );
        assert_eq!(
            store.remove_section(&SectionId::new("x")).unwrap_err(),
            StoreError::NoDocument
        );
    }
}
