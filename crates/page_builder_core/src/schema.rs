//! crates/page_builder_core/src/schema.rs
//!
//! Declarative validation schemas, one per template. Lookup is a pure
//! `TemplateId -> &'static SectionSchema` map; `template3` and `template4`
//! present the same shape under different layouts and share one entry.
//!
//! Validation is advisory while editing (the store always accepts the latest
//! attempted values) and is enforced by the save pipeline before submission.

use crate::domain::{
    BannerData, HeroData, ImageRef, ParagraphGroup, RichTextData, SectionBody, StepData,
    TemplateId,
};
use serde::Serialize;

//=========================================================================================
// Schema entries
//=========================================================================================

/// Minimum entry count for one repeatable group field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRule {
    pub field: &'static str,
    pub min: usize,
}

/// The declarative shape of one template's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSchema {
    /// Scalar fields that must be non-blank at save time.
    pub required: &'static [&'static str],
    /// Repeatable groups and their minimum counts.
    pub groups: &'static [GroupRule],
}

impl SectionSchema {
    pub fn group_min(&self, field: &str) -> usize {
        self.groups
            .iter()
            .find(|rule| rule.field == field)
            .map_or(0, |rule| rule.min)
    }
}

static HERO: SectionSchema = SectionSchema {
    required: &["heading"],
    groups: &[],
};

static STEP: SectionSchema = SectionSchema {
    required: &["stepNumber", "heading"],
    groups: &[GroupRule {
        field: "description.paragraphs",
        min: 1,
    }],
};

static RICH_TEXT: SectionSchema = SectionSchema {
    required: &["heading"],
    groups: &[GroupRule {
        field: "body.paragraphs",
        min: 1,
    }],
};

static BANNER: SectionSchema = SectionSchema {
    required: &["heading", "buttonLabel", "buttonUrl"],
    groups: &[],
};

/// The registry lookup.
pub fn schema_for(template: TemplateId) -> &'static SectionSchema {
    match template {
        TemplateId::Template1 => &HERO,
        TemplateId::Template2 => &STEP,
        // Structural alias: same shape, different published layout.
        TemplateId::Template3 | TemplateId::Template4 => &RICH_TEXT,
        TemplateId::Template5 => &BANNER,
    }
}

//=========================================================================================
// Validation
//=========================================================================================

/// One field-level validation failure, in wire spelling so editors can attach
/// it to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn required(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: format!("{field} is required"),
        }
    }

    fn min_entries(field: &str, min: usize) -> Self {
        Self {
            field: field.to_owned(),
            message: format!("{field} needs at least {min} entry(ies)"),
        }
    }
}

/// Checks a body against its template's schema.
pub fn validate(body: &SectionBody) -> Result<(), Vec<FieldError>> {
    let schema = schema_for(body.template());
    let mut errors = Vec::new();

    for field in schema.required {
        match body.text_field(field) {
            Some(value) if !value.trim().is_empty() => {}
            _ => errors.push(FieldError::required(field)),
        }
    }
    for rule in schema.groups {
        if body.group_len(rule.field).unwrap_or(0) < rule.min {
            errors.push(FieldError::min_entries(rule.field, rule.min));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//=========================================================================================
// Defaults for freshly added sections
//=========================================================================================

/// The body a newly added section starts with: blank scalars, repeatable
/// groups pre-filled to their schema minimum, no image.
pub fn default_body(template: TemplateId) -> SectionBody {
    let schema = schema_for(template);
    match template {
        TemplateId::Template1 => SectionBody::Hero(HeroData::default()),
        TemplateId::Template2 => SectionBody::Step(StepData {
            step_number: String::new(),
            heading: String::new(),
            description: ParagraphGroup::seeded(schema.group_min("description.paragraphs")),
            image: ImageRef::Empty,
        }),
        TemplateId::Template3 => SectionBody::RichText(RichTextData {
            heading: String::new(),
            body: ParagraphGroup::seeded(schema.group_min("body.paragraphs")),
        }),
        TemplateId::Template4 => SectionBody::RichTextAlt(RichTextData {
            heading: String::new(),
            body: ParagraphGroup::seeded(schema.group_min("body.paragraphs")),
        }),
        TemplateId::Template5 => SectionBody::Banner(BannerData::default()),
    }
}
