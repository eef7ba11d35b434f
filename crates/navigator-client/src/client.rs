//! HTTP client for the Navigator REST API

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::config::NavigatorConfig;
use crate::entity::Entity;
use crate::error::{NavigatorError, NavigatorResult};
use crate::model::{EntityRecord, Source, SourceType};
use crate::writer::WriteResult;

/// Query selecting every registered source
pub const SOURCE_QUERY: &str = "type:SOURCE";

/// Upper bound on sources fetched in one request
const SOURCE_LIMIT: usize = 1000;

/// Request payload for one page of a cursor-based search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PagingRequest<'a> {
    query: &'a str,
    limit: usize,
    cursor_mark: &'a str,
}

/// One page of search results
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPage {
    #[serde(default)]
    pub results: Vec<EntityRecord>,

    /// Cursor for the following page
    #[serde(default)]
    pub cursor_mark: Option<String>,
}

/// Client for the Navigator REST API
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct NavApiClient {
    config: Arc<NavigatorConfig>,
    api_url: String,
    client: Client,
}

impl NavApiClient {
    /// Creates a client from a validated configuration
    pub fn new(config: NavigatorConfig) -> NavigatorResult<Self> {
        let mut builder = Client::builder().danger_accept_invalid_certs(config.disable_ssl_validation);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NavigatorError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_url: config.api_url(),
            config: Arc::new(config),
            client,
        })
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.api_url, path.trim_start_matches('/'));
        let builder = self.client.request(method, url);
        match (&self.config.username, &self.config.password) {
            (Some(user), password) => builder.basic_auth(user, password.as_deref()),
            _ => builder,
        }
    }

    /// Entities matching `query`, at most `limit` of them, in one request
    #[instrument(skip(self))]
    pub async fn get_entities(&self, query: &str, limit: usize) -> NavigatorResult<Vec<Value>> {
        debug!("Fetching entities");
        let limit = limit.to_string();
        let response = self
            .request(Method::GET, "entities")
            .query(&[("query", query), ("limit", limit.as_str())])
            .send()
            .await?;

        let response = check_read(response).await?;
        Ok(response.json().await?)
    }

    /// Every source registered with the service
    pub async fn sources(&self) -> NavigatorResult<Vec<Source>> {
        let values = self.get_entities(SOURCE_QUERY, SOURCE_LIMIT).await?;
        values
            .into_iter()
            .map(|value| {
                serde_json::from_value::<Source>(value)
                    .map_err(|e| NavigatorError::Decode(format!("Invalid source entity: {}", e)))
            })
            .collect()
    }

    /// The single source of the given type
    #[instrument(skip(self))]
    pub async fn only_source(&self, source_type: SourceType) -> NavigatorResult<Source> {
        let mut matching: Vec<Source> = self
            .sources()
            .await?
            .into_iter()
            .filter(|source| source.source_type == source_type)
            .collect();

        match matching.len() {
            1 => Ok(matching.remove(0)),
            0 => Err(NavigatorError::SourceLookup(format!(
                "No {} source registered",
                source_type
            ))),
            n => Err(NavigatorError::SourceLookup(format!(
                "Found {} {} sources, expected one",
                n, source_type
            ))),
        }
    }

    /// One page of results for `query`, starting at `cursor_mark` (`*` for the first page)
    #[instrument(skip(self), fields(limit = limit))]
    pub async fn page(&self, query: &str, limit: usize, cursor_mark: &str) -> NavigatorResult<EntityPage> {
        let request = PagingRequest {
            query,
            limit,
            cursor_mark,
        };
        let response = self
            .request(Method::POST, "entities/paging")
            .json(&request)
            .send()
            .await?;

        let response = check_read(response).await?;
        let page: EntityPage = response.json().await?;
        debug!(results = page.results.len(), "Fetched page");
        Ok(page)
    }

    /// Submit one entity to the write endpoint
    #[instrument(skip(self, entity), fields(source_id = %entity.source_id()))]
    pub async fn write_entity(&self, entity: &Entity) -> NavigatorResult<WriteResult> {
        debug!("Writing entity {}", entity.display_name());
        let response = self
            .request(Method::POST, "entities/")
            .json(entity)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(WriteResult::success(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| format!("HTTP error: {}", status));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(NavigatorError::Auth {
                status: status.as_u16(),
                message: body,
            }),
            _ => {
                error!("Write rejected: {}", body);
                Ok(WriteResult::failed(status.as_u16(), body))
            }
        }
    }
}

/// Map non-success read responses to errors
async fn check_read(response: Response) -> NavigatorResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| format!("HTTP error: {}", status));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(NavigatorError::Auth {
            status: status.as_u16(),
            message: body,
        }),
        _ => Err(NavigatorError::Query {
            status: status.as_u16(),
            message: body,
        }),
    }
}
