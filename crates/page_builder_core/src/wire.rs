//! crates/page_builder_core/src/wire.rs
//!
//! Serde shapes for the upstream CMS backend. A section is encoded as
//! `{id, templateId, data}` with the template selecting the `data` shape.
//!
//! Encoding is fallible on purpose: a section whose image slot still holds a
//! staged file cannot be represented here at all, so transient fields can
//! never leak into a persisted payload. The save pipeline resolves every
//! staged image to a path before it encodes.

use crate::domain::{
    BannerData, HeroData, ImageRef, ParagraphGroup, RichTextData, Section, SectionBody, SectionId,
    Slug, StepData,
};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Wire structs
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSection {
    pub id: SectionId,
    #[serde(flatten)]
    pub body: WireBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "templateId", content = "data")]
pub enum WireBody {
    #[serde(rename = "template1")]
    Template1(WireHero),
    #[serde(rename = "template2")]
    Template2(WireStep),
    #[serde(rename = "template3")]
    Template3(WireRichText),
    #[serde(rename = "template4")]
    Template4(WireRichText),
    #[serde(rename = "template5")]
    Template5(WireBanner),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireHero {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStep {
    #[serde(default)]
    pub step_number: String,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub description: ParagraphGroup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRichText {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: ParagraphGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBanner {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub button_label: String,
    #[serde(default)]
    pub button_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The finalized `{slug, sections}` document submitted by the save pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePayload {
    pub slug: Slug,
    pub sections: Vec<WireSection>,
}

//=========================================================================================
// Domain -> wire (fallible while an image is staged)
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("section {section} still has an unresolved staged image")]
pub struct StagedImageError {
    pub section: SectionId,
}

fn encode_image(image: &ImageRef, section: &SectionId) -> Result<Option<String>, StagedImageError> {
    match image {
        ImageRef::Empty => Ok(None),
        ImageRef::Persisted(path) => Ok(Some(path.clone())),
        ImageRef::Pending(_) => Err(StagedImageError {
            section: section.clone(),
        }),
    }
}

impl TryFrom<&Section> for WireSection {
    type Error = StagedImageError;

    fn try_from(section: &Section) -> Result<Self, Self::Error> {
        let id = &section.id;
        let body = match &section.body {
            SectionBody::Hero(d) => WireBody::Template1(WireHero {
                heading: d.heading.clone(),
                tagline: d.tagline.clone(),
                image: encode_image(&d.image, id)?,
            }),
            SectionBody::Step(d) => WireBody::Template2(WireStep {
                step_number: d.step_number.clone(),
                heading: d.heading.clone(),
                description: d.description.clone(),
                image: encode_image(&d.image, id)?,
            }),
            SectionBody::RichText(d) => WireBody::Template3(WireRichText {
                heading: d.heading.clone(),
                body: d.body.clone(),
            }),
            SectionBody::RichTextAlt(d) => WireBody::Template4(WireRichText {
                heading: d.heading.clone(),
                body: d.body.clone(),
            }),
            SectionBody::Banner(d) => WireBody::Template5(WireBanner {
                heading: d.heading.clone(),
                button_label: d.button_label.clone(),
                button_url: d.button_url.clone(),
                image: encode_image(&d.image, id)?,
            }),
        };
        Ok(Self {
            id: id.clone(),
            body,
        })
    }
}

//=========================================================================================
// Wire -> domain (infallible; a loaded section is never pending)
//=========================================================================================

fn decode_image(image: Option<String>) -> ImageRef {
    match image {
        Some(path) => ImageRef::Persisted(path),
        None => ImageRef::Empty,
    }
}

impl From<WireBody> for SectionBody {
    fn from(body: WireBody) -> Self {
        match body {
            WireBody::Template1(d) => Self::Hero(HeroData {
                heading: d.heading,
                tagline: d.tagline,
                image: decode_image(d.image),
            }),
            WireBody::Template2(d) => Self::Step(StepData {
                step_number: d.step_number,
                heading: d.heading,
                description: d.description,
                image: decode_image(d.image),
            }),
            WireBody::Template3(d) => Self::RichText(RichTextData {
                heading: d.heading,
                body: d.body,
            }),
            WireBody::Template4(d) => Self::RichTextAlt(RichTextData {
                heading: d.heading,
                body: d.body,
            }),
            WireBody::Template5(d) => Self::Banner(BannerData {
                heading: d.heading,
                button_label: d.button_label,
                button_url: d.button_url,
                image: decode_image(d.image),
            }),
        }
    }
}

impl From<WireSection> for Section {
    fn from(wire: WireSection) -> Self {
        Self {
            id: wire.id,
            body: wire.body.into(),
        }
    }
}

//=========================================================================================
// Editor-facing encodings
//=========================================================================================

/// Encodes a section for a display/view payload. A staged image is masked to
/// the empty slot (its bytes are transient and never leave session memory),
/// so unlike the wire encoding this cannot fail; the flag tells the caller a
/// staged file exists and a preview should be rendered instead.
pub fn encode_for_display(section: &Section) -> (WireSection, bool) {
    let display_image = |image: &ImageRef| image.persisted_path().map(str::to_owned);
    let pending = section
        .body
        .image()
        .is_some_and(|image| image.is_pending());
    let body = match &section.body {
        SectionBody::Hero(d) => WireBody::Template1(WireHero {
            heading: d.heading.clone(),
            tagline: d.tagline.clone(),
            image: display_image(&d.image),
        }),
        SectionBody::Step(d) => WireBody::Template2(WireStep {
            step_number: d.step_number.clone(),
            heading: d.heading.clone(),
            description: d.description.clone(),
            image: display_image(&d.image),
        }),
        SectionBody::RichText(d) => WireBody::Template3(WireRichText {
            heading: d.heading.clone(),
            body: d.body.clone(),
        }),
        SectionBody::RichTextAlt(d) => WireBody::Template4(WireRichText {
            heading: d.heading.clone(),
            body: d.body.clone(),
        }),
        SectionBody::Banner(d) => WireBody::Template5(WireBanner {
            heading: d.heading.clone(),
            button_label: d.button_label.clone(),
            button_url: d.button_url.clone(),
            image: display_image(&d.image),
        }),
    };
    (
        WireSection {
            id: section.id.clone(),
            body,
        },
        pending,
    )
}

/// Decodes an editor's full-values object against a known template.
///
/// The sync endpoint receives only the `data` object; the section's own
/// (immutable) template supplies the tag.
pub fn body_from_template_value(
    template: crate::domain::TemplateId,
    data: serde_json::Value,
) -> Result<SectionBody, serde_json::Error> {
    let tagged = serde_json::json!({ "templateId": template, "data": data });
    let wire: WireBody = serde_json::from_value(tagged)?;
    Ok(wire.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Paragraph, PendingImage, TemplateId};
    use bytes::Bytes;
    use serde_json::json;

    fn pricing_section_json() -> serde_json::Value {
        json!({
            "id": "s1",
            "templateId": "template2",
            "data": {
                "stepNumber": "01",
                "heading": "Pick a plan",
                "description": { "paragraphs": [ { "id": 1, "content": "x" } ] },
                "image": "/img/a.png"
            }
        })
    }

    #[test]
    fn decodes_backend_section_into_domain() {
        let wire: WireSection = serde_json::from_value(pricing_section_json()).unwrap();
        let section = Section::from(wire);

        assert_eq!(section.id.as_str(), "s1");
        assert_eq!(section.template(), TemplateId::Template2);
        let SectionBody::Step(data) = &section.body else {
            panic!("expected step body");
        };
        assert_eq!(data.step_number, "01");
        assert_eq!(data.heading, "Pick a plan");
        assert_eq!(data.description.paragraphs, vec![Paragraph { id: 1, content: "x".into() }]);
        assert_eq!(data.image, ImageRef::Persisted("/img/a.png".into()));
    }

    #[test]
    fn load_then_encode_round_trips_unchanged() {
        let wire: WireSection = serde_json::from_value(pricing_section_json()).unwrap();
        let section = Section::from(wire);
        let encoded = WireSection::try_from(&section).unwrap();
        assert_eq!(serde_json::to_value(&encoded).unwrap(), pricing_section_json());
    }

    #[test]
    fn refuses_to_encode_a_staged_image() {
        let section = Section {
            id: SectionId::new("s1"),
            body: SectionBody::Hero(HeroData {
                heading: "h".into(),
                tagline: String::new(),
                image: ImageRef::Pending(PendingImage {
                    file_name: "new.png".into(),
                    content_type: "image/png".into(),
                    bytes: Bytes::from_static(b"png"),
                }),
            }),
        };
        let err = WireSection::try_from(&section).unwrap_err();
        assert_eq!(err.section.as_str(), "s1");
    }

    #[test]
    fn empty_image_slot_is_omitted_from_the_payload() {
        let section = Section {
            id: SectionId::new("s2"),
            body: SectionBody::Hero(HeroData::default()),
        };
        let value = serde_json::to_value(WireSection::try_from(&section).unwrap()).unwrap();
        assert!(value["data"].get("image").is_none());
        assert!(value["data"].get("imageFile").is_none());
        assert!(value["data"].get("imagePreview").is_none());
    }

    #[test]
    fn display_encoding_masks_a_staged_image() {
        let section = Section {
            id: SectionId::new("s1"),
            body: SectionBody::Hero(HeroData {
                heading: "h".into(),
                tagline: String::new(),
                image: ImageRef::Pending(PendingImage {
                    file_name: "new.png".into(),
                    content_type: "image/png".into(),
                    bytes: Bytes::from_static(b"png"),
                }),
            }),
        };
        let (wire, pending) = encode_for_display(&section);
        assert!(pending);
        let value = serde_json::to_value(&wire).unwrap();
        assert!(value["data"].get("image").is_none());
    }

    #[test]
    fn editor_values_decode_against_the_section_template() {
        let body = body_from_template_value(
            TemplateId::Template2,
            json!({
                "stepNumber": "02",
                "heading": "Choose a device",
                "description": { "paragraphs": [ { "id": 1, "content": "y" } ] }
            }),
        )
        .unwrap();
        assert_eq!(body.template(), TemplateId::Template2);
        assert_eq!(body.text_field("stepNumber"), Some("02"));
    }

    #[test]
    fn editor_values_for_another_template_shape_still_tag_correctly() {
        // template4 aliases template3's shape but keeps its own tag.
        let body = body_from_template_value(
            TemplateId::Template4,
            json!({ "heading": "FAQ", "body": { "paragraphs": [ { "id": 1, "content": "q" } ] } }),
        )
        .unwrap();
        assert_eq!(body.template(), TemplateId::Template4);
    }
}
