//! crates/page_builder_core/src/domain.rs
//!
//! Pure data structures for the page-builder core: the page document, its
//! sections, and the image reference lifecycle. These structs are independent
//! of any HTTP client or serialization envelope; the wire shapes live in
//! `wire.rs`.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Identifiers
//=========================================================================================

/// The persistence key of a page. Non-empty, and never contains `/` because
/// slugs appear as a path segment in the backend's `/pages/{slug}` routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("slug must not be empty")]
    Empty,
    #[error("slug must not contain '/'")]
    ContainsSlash,
}

impl Slug {
    pub fn new(value: impl Into<String>) -> Result<Self, SlugError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SlugError::Empty);
        }
        if value.contains('/') {
            return Err(SlugError::ContainsSlash);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

/// Stable identity of one section, assigned at creation and never reassigned.
///
/// Edits are routed by this id rather than by array index, so a reorder or a
/// stale editor can never clobber an unrelated section. Freshly added sections
/// get a v4 UUID; ids loaded from the backend are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//=========================================================================================
// Templates
//=========================================================================================

/// Discriminator selecting a section's field shape, schema entry and editor
/// rendering. Immutable per section; changing template means removing the
/// section and adding a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateId {
    #[serde(rename = "template1")]
    Template1,
    #[serde(rename = "template2")]
    Template2,
    #[serde(rename = "template3")]
    Template3,
    #[serde(rename = "template4")]
    Template4,
    #[serde(rename = "template5")]
    Template5,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown template id: {0}")]
pub struct UnknownTemplate(pub String);

impl TemplateId {
    pub const ALL: [Self; 5] = [
        Self::Template1,
        Self::Template2,
        Self::Template3,
        Self::Template4,
        Self::Template5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Template1 => "template1",
            Self::Template2 => "template2",
            Self::Template3 => "template3",
            Self::Template4 => "template4",
            Self::Template5 => "template5",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "template1" => Ok(Self::Template1),
            "template2" => Ok(Self::Template2),
            "template3" => Ok(Self::Template3),
            "template4" => Ok(Self::Template4),
            "template5" => Ok(Self::Template5),
            other => Err(UnknownTemplate(other.to_owned())),
        }
    }
}

//=========================================================================================
// Repeatable paragraph groups
//=========================================================================================

/// One entry of a repeatable paragraph group. The `id` is stable per entry so
/// editors can key their rows on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub id: u64,
    pub content: String,
}

/// An ordered sequence of paragraphs nested under a section field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphGroup {
    pub paragraphs: Vec<Paragraph>,
}

impl ParagraphGroup {
    /// A group pre-filled with `count` empty entries, ids `1..=count`.
    pub fn seeded(count: usize) -> Self {
        Self {
            paragraphs: (1..=count as u64)
                .map(|id| Paragraph {
                    id,
                    content: String::new(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

//=========================================================================================
// Image references
//=========================================================================================

/// A file staged in the edit session but not yet uploaded to the backend.
///
/// Staged bytes and their preview are transient: they exist only in session
/// memory and are resolved to a persisted path by the save pipeline. They are
/// never part of any wire payload (see `wire.rs`, which refuses to encode a
/// section while one of these is still attached).
#[derive(Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl fmt::Debug for PendingImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The image slot of a section. At most one of the persisted path and the
/// staged file is active; a staged file takes precedence for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageRef {
    /// No image.
    #[default]
    Empty,
    /// A backend-relative path, e.g. `/img/a.png`.
    Persisted(String),
    /// A locally staged file awaiting upload at save time.
    Pending(PendingImage),
}

impl ImageRef {
    pub fn persisted_path(&self) -> Option<&str> {
        match self {
            Self::Persisted(path) => Some(path),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingImage> {
        match self {
            Self::Pending(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

//=========================================================================================
// Section payloads, one struct per template shape
//=========================================================================================

/// `template1` — hero banner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroData {
    pub heading: String,
    pub tagline: String,
    pub image: ImageRef,
}

/// `template2` — numbered "how it works" step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepData {
    pub step_number: String,
    pub heading: String,
    pub description: ParagraphGroup,
    pub image: ImageRef,
}

/// `template3`/`template4` — heading plus paragraphs. The two templates share
/// this shape and schema; only the published layout differs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichTextData {
    pub heading: String,
    pub body: ParagraphGroup,
}

/// `template5` — call-to-action banner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BannerData {
    pub heading: String,
    pub button_label: String,
    pub button_url: String,
    pub image: ImageRef,
}

/// The template-tagged payload of a section.
///
/// Modeled as a closed union rather than a free-form map so that schema lookup
/// and editor dispatch are exhaustive; a payload for the wrong template cannot
/// be attached to a section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Hero(HeroData),
    Step(StepData),
    RichText(RichTextData),
    RichTextAlt(RichTextData),
    Banner(BannerData),
}

impl SectionBody {
    pub fn template(&self) -> TemplateId {
        match self {
            Self::Hero(_) => TemplateId::Template1,
            Self::Step(_) => TemplateId::Template2,
            Self::RichText(_) => TemplateId::Template3,
            Self::RichTextAlt(_) => TemplateId::Template4,
            Self::Banner(_) => TemplateId::Template5,
        }
    }

    /// The image slot of this body, if the template carries one.
    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            Self::Hero(d) => Some(&d.image),
            Self::Step(d) => Some(&d.image),
            Self::Banner(d) => Some(&d.image),
            Self::RichText(_) | Self::RichTextAlt(_) => None,
        }
    }

    pub fn image_mut(&mut self) -> Option<&mut ImageRef> {
        match self {
            Self::Hero(d) => Some(&mut d.image),
            Self::Step(d) => Some(&mut d.image),
            Self::Banner(d) => Some(&mut d.image),
            Self::RichText(_) | Self::RichTextAlt(_) => None,
        }
    }

    /// Named scalar field lookup, used by the schema registry's declarative
    /// rules. Field names match the wire spelling.
    pub fn text_field(&self, field: &str) -> Option<&str> {
        match (self, field) {
            (Self::Hero(d), "heading") => Some(&d.heading),
            (Self::Hero(d), "tagline") => Some(&d.tagline),
            (Self::Step(d), "stepNumber") => Some(&d.step_number),
            (Self::Step(d), "heading") => Some(&d.heading),
            (Self::RichText(d) | Self::RichTextAlt(d), "heading") => Some(&d.heading),
            (Self::Banner(d), "heading") => Some(&d.heading),
            (Self::Banner(d), "buttonLabel") => Some(&d.button_label),
            (Self::Banner(d), "buttonUrl") => Some(&d.button_url),
            _ => None,
        }
    }

    /// Entry count of a named repeatable group, used by the schema registry.
    pub fn group_len(&self, field: &str) -> Option<usize> {
        match (self, field) {
            (Self::Step(d), "description.paragraphs") => Some(d.description.len()),
            (Self::RichText(d) | Self::RichTextAlt(d), "body.paragraphs") => Some(d.body.len()),
            _ => None,
        }
    }
}

//=========================================================================================
// Sections and documents
//=========================================================================================

/// One editable block of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub body: SectionBody,
}

impl Section {
    pub fn template(&self) -> TemplateId {
        self.body.template()
    }
}

/// A deep copy of the document under edit, handed to the save pipeline so the
/// store itself stays untouched until the save settles.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// `None` while the store is reset/uninitialized.
    pub slug: Option<Slug>,
    pub sections: Vec<Section>,
}

/// Directory-view metadata for one known page. Does not affect whatever
/// document is currently loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub slug: Slug,
    pub section_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rejects_empty() {
        assert_eq!(Slug::new(""), Err(SlugError::Empty));
    }

    #[test]
    fn slug_rejects_slash() {
        assert_eq!(Slug::new("a/b"), Err(SlugError::ContainsSlash));
    }

    #[test]
    fn template_id_round_trips_through_str() {
        for template in TemplateId::ALL {
            assert_eq!(template.as_str().parse::<TemplateId>(), Ok(template));
        }
        assert!("template9".parse::<TemplateId>().is_err());
    }

    #[test]
    fn seeded_group_numbers_entries_from_one() {
        let group = ParagraphGroup::seeded(2);
        assert_eq!(group.len(), 2);
        assert_eq!(group.paragraphs[0].id, 1);
        assert_eq!(group.paragraphs[1].id, 2);
        assert!(group.paragraphs.iter().all(|p| p.content.is_empty()));
    }

    #[test]
    fn pending_image_takes_precedence_flags() {
        let image = ImageRef::Pending(PendingImage {
            file_name: "a.png".into(),
            content_type: "image/png".into(),
            bytes: bytes::Bytes::from_static(b"\x89PNG"),
        });
        assert!(image.is_pending());
        assert_eq!(image.persisted_path(), None);
    }

    #[test]
    fn rich_text_templates_share_field_names() {
        let body = SectionBody::RichTextAlt(RichTextData {
            heading: "h".into(),
            body: ParagraphGroup::seeded(1),
        });
        assert_eq!(body.text_field("heading"), Some("h"));
        assert_eq!(body.group_len("body.paragraphs"), Some(1));
        assert_eq!(body.group_len("description.paragraphs"), None);
    }
}
