//! services/api/src/adapters/images.rs
//!
//! This module contains the upload adapter, which is the concrete
//! implementation of the `ImageUploader` port from the core crate. It posts a
//! staged file to the upstream backend's `/image/upload` endpoint and
//! normalizes the response into a persisted path.

use async_trait::async_trait;
use page_builder_core::domain::PendingImage;
use page_builder_core::ports::{ImageUploader, PortError, PortResult, StoredImage};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An upload adapter that implements the `ImageUploader` port against the
/// upstream backend's multipart endpoint.
#[derive(Clone)]
pub struct HttpImageUploader {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpImageUploader {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Pulls the persisted path out of the upload response.
///
/// The endpoint's envelope is not uniform across backend versions; every
/// known spelling is accepted here, in one place, and nowhere else.
pub(crate) fn parse_stored_path(body: &Value) -> Option<String> {
    [
        body.get("path"),
        body.get("url"),
        body.get("data").and_then(|data| data.get("path")),
        body.get("data").and_then(|data| data.get("url")),
    ]
    .into_iter()
    .flatten()
    .find_map(Value::as_str)
    .map(str::to_owned)
}

//=========================================================================================
// `ImageUploader` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageUploader for HttpImageUploader {
    async fn upload(&self, image: &PendingImage) -> PortResult<StoredImage> {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| PortError::Unexpected(format!("invalid content type: {e}")))?;
        let form = Form::new().part("file", part);

        let response = self
            .authorize(self.client.post(format!("{}/image/upload", self.base_url)))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(PortError::Unauthorized)
            }
            status if !status.is_success() => {
                return Err(PortError::Unexpected(format!(
                    "image upload returned {status}"
                )))
            }
            _ => {}
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("malformed upload body: {e}")))?;
        let path = parse_stored_path(&body).ok_or_else(|| {
            PortError::Unexpected("upload response did not contain a stored path".into())
        })?;
        Ok(StoredImage { path })
    }
}

#[cfg(test)]
mod tests {
    use super::parse_stored_path;
    use serde_json::json;

    #[test]
    fn accepts_every_known_envelope_shape() {
        let cases = [
            json!({ "path": "/uploads/a.png" }),
            json!({ "url": "/uploads/a.png" }),
            json!({ "data": { "path": "/uploads/a.png" } }),
            json!({ "data": { "url": "/uploads/a.png" } }),
        ];
        for body in cases {
            assert_eq!(parse_stored_path(&body).as_deref(), Some("/uploads/a.png"), "{body}");
        }
    }

    #[test]
    fn top_level_path_wins_over_nested_spellings() {
        let body = json!({ "path": "/uploads/top.png", "data": { "url": "/uploads/nested.png" } });
        assert_eq!(parse_stored_path(&body).as_deref(), Some("/uploads/top.png"));
    }

    #[test]
    fn unknown_envelopes_yield_nothing() {
        assert_eq!(parse_stored_path(&json!({ "ok": true })), None);
        assert_eq!(parse_stored_path(&json!({ "path": 42 })), None);
    }
}
