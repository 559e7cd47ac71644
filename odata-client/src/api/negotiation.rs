//! Protocol negotiation: choose an adapter family from what the service reports

use log::{debug, info};
use reqwest::header::HeaderMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::adapter::{AdapterVersion, ODataAdapter, ODataAdapterV3, ODataAdapterV4};
use super::constants::{METADATA_LITERAL, V3_VERSION_TOKENS, V4_VERSION_TOKEN, VERSION_HEADERS};
use super::error::{ODataError, Result};
use super::metadata::{CsdlParser, SchemaParser, read_document_version};
use super::naming::NameMatcher;
use super::transport::{Credentials, HttpTransport, MetadataResponse, MetadataTransport};
use crate::config::ClientSettings;

/// Split header values on `;`, trimming and dropping empty tokens
pub fn version_tokens<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Vec<String> {
    values
        .into_iter()
        .flat_map(|value| {
            value
                .as_ref()
                .split(';')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Tokens of the first version header present, or `None` if neither is
///
/// Presence alone decides which header wins; undecodable bytes become
/// replacement characters so the header still yields (unsupported) tokens.
pub fn response_version_tokens(headers: &HeaderMap) -> Option<Vec<String>> {
    let name = VERSION_HEADERS
        .iter()
        .find(|name| headers.contains_key(**name))?;
    let values: Vec<String> = headers
        .get_all(*name)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    debug!("Protocol version reported via {}: {:?}", name, values);
    Some(version_tokens(values))
}

/// Family and protocol version selected by `tokens`
///
/// A "4.0" token selects V4 over any v1-v3 token; the returned version is the
/// token that matched.
pub fn select_family(tokens: &[String]) -> Result<(AdapterVersion, String)> {
    if tokens.is_empty() {
        return Err(ODataError::VersionUndeterminable);
    }
    if let Some(token) = tokens.iter().find(|t| t.as_str() == V4_VERSION_TOKEN) {
        return Ok((AdapterVersion::V4, token.clone()));
    }
    if let Some(token) = tokens
        .iter()
        .find(|t| V3_VERSION_TOKENS.contains(&t.as_str()))
    {
        return Ok((AdapterVersion::V3, token.clone()));
    }
    Err(ODataError::UnsupportedProtocol {
        tokens: tokens.to_vec(),
    })
}

/// Builds the adapter matching a service's protocol version
pub struct AdapterFactory {
    base_url: String,
    credentials: Credentials,
    matcher: NameMatcher,
    transport: Arc<dyn MetadataTransport>,
    parser: Arc<dyn SchemaParser>,
}

impl fmt::Debug for AdapterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterFactory")
            .field("base_url", &self.base_url)
            .field("matcher", &self.matcher)
            .field("parser", &self.parser)
            .finish()
    }
}

impl AdapterFactory {
    /// Factory talking HTTP with the settings' timeout and credentials
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let transport = HttpTransport::new(settings.request_timeout())?;
        Ok(Self::with_transport(settings, Arc::new(transport)))
    }

    pub fn with_transport(
        settings: &ClientSettings,
        transport: Arc<dyn MetadataTransport>,
    ) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            credentials: settings.credentials.clone(),
            matcher: NameMatcher::from_policy(settings.pluralization),
            transport,
            parser: Arc::new(CsdlParser),
        }
    }

    /// Replace the metadata document parser
    pub fn with_parser(mut self, parser: Arc<dyn SchemaParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn metadata_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), METADATA_LITERAL)
    }

    /// Choose the family from the response headers and parse the body with it
    pub fn negotiate_from_response(
        &self,
        response: &MetadataResponse,
    ) -> Result<Arc<dyn ODataAdapter>> {
        let tokens =
            response_version_tokens(&response.headers).ok_or(ODataError::VersionUndeterminable)?;
        let (version, protocol_version) = select_family(&tokens)?;
        self.create_adapter(version, protocol_version, &response.body)
    }

    /// Choose the family from the document root's `Version` attribute
    pub fn negotiate_from_document(&self, metadata_text: &str) -> Result<Arc<dyn ODataAdapter>> {
        let version =
            read_document_version(metadata_text)?.ok_or(ODataError::VersionUndeterminable)?;
        let (family, protocol_version) = select_family(&version_tokens([version.as_str()]))?;
        self.create_adapter(family, protocol_version, metadata_text)
    }

    pub async fn fetch_metadata(&self, cancel: &CancellationToken) -> Result<MetadataResponse> {
        let url = self.metadata_url();
        self.transport
            .send_metadata_request(&url, &self.credentials, cancel)
            .await
    }

    /// Fetch `$metadata` and negotiate from the response
    pub async fn negotiate(&self, cancel: &CancellationToken) -> Result<Arc<dyn ODataAdapter>> {
        let response = self.fetch_metadata(cancel).await?;
        self.negotiate_from_response(&response)
    }

    fn create_adapter(
        &self,
        version: AdapterVersion,
        protocol_version: String,
        metadata_text: &str,
    ) -> Result<Arc<dyn ODataAdapter>> {
        info!("Negotiated OData {} adapter (protocol {})", version, protocol_version);
        let parser = self.parser.as_ref();
        let matcher = self.matcher.clone();
        Ok(match version {
            AdapterVersion::V3 => Arc::new(ODataAdapterV3::from_document(
                protocol_version,
                metadata_text,
                parser,
                matcher,
            )?),
            AdapterVersion::V4 => Arc::new(ODataAdapterV4::from_document(
                protocol_version,
                metadata_text,
                parser,
                matcher,
            )?),
        })
    }
}
