pub mod domain;
pub mod images;
pub mod ports;
pub mod save;
pub mod schema;
pub mod store;
pub mod wire;

pub use domain::{
    DocumentSnapshot, ImageRef, PageSummary, Paragraph, ParagraphGroup, PendingImage, Section,
    SectionBody, SectionId, Slug, TemplateId,
};
pub use ports::{ImageUploader, PageRepository, PortError, PortResult, StoredImage};
pub use save::{SaveError, SavePipeline};
pub use store::{DocumentStore, StoreError};
pub use wire::{PagePayload, WireSection};
