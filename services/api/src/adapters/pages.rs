//! services/api/src/adapters/pages.rs
//!
//! This module contains the page adapter, which is the concrete
//! implementation of the `PageRepository` port from the core crate. It talks
//! to the upstream CMS backend's `/pages` endpoints over HTTP.

use async_trait::async_trait;
use page_builder_core::domain::{PageSummary, Section, Slug};
use page_builder_core::ports::{PageRepository, PortError, PortResult};
use page_builder_core::wire::{PagePayload, WireSection};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A page adapter that implements the `PageRepository` port against the
/// upstream REST backend.
#[derive(Clone)]
pub struct HttpPageRepository {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPageRepository {
    /// Creates a new `HttpPageRepository`. The bearer token, when present,
    /// is attached to every request.
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

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Maps a non-success upstream status to the port taxonomy. `404` is handled
/// by the callers that give it a meaning.
fn status_error(context: &str, status: StatusCode) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized,
        StatusCode::NOT_FOUND => PortError::NotFound(context.to_owned()),
        other => PortError::Unexpected(format!("{context} returned {other}")),
    }
}

fn transport_error(err: reqwest::Error) -> PortError {
    PortError::Network(err.to_string())
}

//=========================================================================================
// Wire envelopes
//=========================================================================================

#[derive(Deserialize)]
struct PageEnvelope {
    sections: Vec<WireSection>,
}

#[derive(Deserialize)]
struct PageListEnvelope {
    pages: Vec<PageSummary>,
}

#[derive(Serialize)]
struct UpsertBody<'a> {
    sections: &'a [WireSection],
}

//=========================================================================================
// `PageRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl PageRepository for HttpPageRepository {
    async fn fetch_page(&self, slug: &Slug) -> PortResult<Option<Vec<Section>>> {
        let response = self
            .authorize(self.client.get(self.url(&format!("/pages/{slug}"))))
            .send()
            .await
            .map_err(transport_error)?;

        // "No such page yet" is an empty document, not an error.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error("page fetch", response.status()));
        }

        let envelope: PageEnvelope = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("malformed page body: {e}")))?;
        Ok(Some(envelope.sections.into_iter().map(Section::from).collect()))
    }

    async fn list_pages(&self) -> PortResult<Vec<PageSummary>> {
        let response = self
            .authorize(self.client.get(self.url("/pages")))
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(status_error("page list", response.status()));
        }
        let envelope: PageListEnvelope = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("malformed page list body: {e}")))?;
        Ok(envelope.pages)
    }

    async fn upsert_page(&self, page: &PagePayload) -> PortResult<()> {
        let response = self
            .authorize(self.client.put(self.url(&format!("/pages/{}", page.slug))))
            .json(&UpsertBody {
                sections: &page.sections,
            })
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(status_error("page upsert", response.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let repo = HttpPageRepository::new(reqwest::Client::new(), "http://cms.local/api/", None);
        assert_eq!(repo.url("/pages/pricing"), "http://cms.local/api/pages/pricing");
    }

    #[test]
    fn auth_statuses_map_to_unauthorized() {
        assert_eq!(
            status_error("page fetch", StatusCode::UNAUTHORIZED),
            PortError::Unauthorized
        );
        assert_eq!(
            status_error("page fetch", StatusCode::FORBIDDEN),
            PortError::Unauthorized
        );
        assert!(matches!(
            status_error("page upsert", StatusCode::INTERNAL_SERVER_ERROR),
            PortError::Unexpected(_)
        ));
    }
}
