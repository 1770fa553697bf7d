use shared::{
    domain::ViewerTarget,
    protocol::{AnswerResponse, DEFAULT_ASK_PATH, DEFAULT_SERVICE_PORT},
};
use url::Url;

use crate::{
    config::Settings,
    error::{AskError, EndpointError},
};

/// Address of the answering service. Highlighted documents are served from the
/// same origin, so viewer URLs are resolved against it as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    origin: Url,
    ask_path: String,
}

impl ServiceEndpoint {
    pub fn new(
        scheme: &str,
        host: &str,
        port: u16,
        ask_path: &str,
    ) -> Result<Self, EndpointError> {
        let address = format!("{scheme}://{host}:{port}/");
        let origin = Url::parse(&address)
            .map_err(|source| EndpointError::InvalidAddress { address, source })?;
        Ok(Self {
            origin,
            ask_path: ask_path.trim_start_matches('/').to_string(),
        })
    }

    pub fn for_host(host: &str) -> Result<Self, EndpointError> {
        Self::new("http", host, DEFAULT_SERVICE_PORT, DEFAULT_ASK_PATH)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, EndpointError> {
        Self::new(
            &settings.service_scheme,
            &settings.service_host,
            settings.service_port,
            &settings.ask_path,
        )
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn ask_url(&self) -> Url {
        let mut url = self.origin.clone();
        url.set_path(&self.ask_path);
        url
    }

    /// Resolves a path returned by the service against its origin. Anything
    /// that resolves to another scheme, host or port is rejected.
    pub fn resource_url(&self, path: &str) -> Result<Url, AskError> {
        let url = self
            .origin
            .join(path.trim_start_matches('/'))
            .map_err(|source| AskError::ViewerUrl {
                path: path.to_string(),
                source,
            })?;
        if url.origin() != self.origin.origin() {
            return Err(AskError::ForeignViewerUrl {
                path: path.to_string(),
            });
        }
        Ok(url)
    }

    /// Builds the viewer target for a successful answer, if the service
    /// highlighted a document.
    pub fn viewer_target(
        &self,
        response: &AnswerResponse,
    ) -> Result<Option<ViewerTarget>, AskError> {
        let Some(path) = response.highlight_path() else {
            return Ok(None);
        };
        let resource_url = self.resource_url(path)?;
        Ok(Some(ViewerTarget {
            resource_url: resource_url.to_string(),
            page: response.page(),
        }))
    }
}

#[cfg(test)]
#[path = "tests/endpoint_tests.rs"]
mod tests;
