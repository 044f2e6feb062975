use crate::{ClientError, RawResponse, Result};
use orion_core::ngsi::{AppendAttributesRequest, QueryContextRequest, StatusFailure, UpdateContextRequest};
use orion_core::{Attribute, ClientConfig, ContextResponses, Entity, UpdateAction};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use serde::Serialize;

const JSON_MIME: &str = "application/json";

/// NGSI10 Knowledge Processor: one method per broker operation
///
/// Every call is a single independent request; nothing is retried or cached.
pub struct KnowledgeProcessor {
    config: ClientConfig,
    client: HttpClient,
}

impl KnowledgeProcessor {
    /// Create a processor for the broker described by `config`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config,
            client: builder.build()?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL for an NGSI10 path, e.g. `contextEntityTypes/Room`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url(), path)
    }

    /// Create one entity through the convenience endpoint
    #[tracing::instrument(skip(self, entity), fields(entity_id = %entity.id))]
    pub async fn create_entity(&self, entity: &Entity) -> Result<RawResponse> {
        self.send_json(
            Method::POST,
            &format!("contextEntities/{}", urlencoding::encode(&entity.id)),
            entity,
        )
        .await
    }

    /// Append entities in one updateContext call, checking every element's status
    #[tracing::instrument(skip(self, entities), fields(count = entities.len()))]
    pub async fn create_entities(&self, entities: &[Entity]) -> Result<ContextResponses> {
        self.update_context(entities, UpdateAction::Append).await
    }

    /// Overwrite attribute values of existing entities
    #[tracing::instrument(skip(self, entities), fields(count = entities.len()))]
    pub async fn update_entities(&self, entities: &[Entity]) -> Result<ContextResponses> {
        self.update_context(entities, UpdateAction::Update).await
    }

    /// Remove entities, or only the listed attributes when an entity carries some
    #[tracing::instrument(skip(self, entities), fields(count = entities.len()))]
    pub async fn delete_entities(&self, entities: &[Entity]) -> Result<ContextResponses> {
        self.update_context(entities, UpdateAction::Delete).await
    }

    /// Set a single attribute on an existing entity
    #[tracing::instrument(skip(self, attribute), fields(attribute = %attribute.name))]
    pub async fn update_attribute(
        &self,
        entity_id: &str,
        attribute: &Attribute,
    ) -> Result<ContextResponses> {
        let request = AppendAttributesRequest {
            attributes: std::slice::from_ref(attribute),
        };
        let response = self
            .send_json(
                Method::PUT,
                &format!("contextEntities/{}/attributes", urlencoding::encode(entity_id)),
                &request,
            )
            .await?;

        checked(response)
    }

    /// Delete an entity by id. No body is sent.
    #[tracing::instrument(skip(self))]
    pub async fn delete_entity(&self, entity_id: &str) -> Result<RawResponse> {
        self.send_empty(
            Method::DELETE,
            &format!("contextEntities/{}", urlencoding::encode(entity_id)),
        )
        .await
    }

    /// Ids and types are percent-encoded as a single path segment
    #[tracing::instrument(skip(self))]
    pub async fn query_by_entity_id(&self, entity_id: &str) -> Result<RawResponse> {
        self.send_empty(
            Method::GET,
            &format!("contextEntities/{}", urlencoding::encode(entity_id)),
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn query_by_entity_type(&self, entity_type: &str) -> Result<RawResponse> {
        self.send_empty(
            Method::GET,
            &format!("contextEntityTypes/{}", urlencoding::encode(entity_type)),
        )
        .await
    }

    /// queryContext for a list of entities (literal or pattern)
    #[tracing::instrument(skip(self, entities), fields(count = entities.len()))]
    pub async fn query(&self, entities: &[Entity]) -> Result<RawResponse> {
        let request = QueryContextRequest { entities };
        self.send_json(Method::POST, "queryContext", &request).await
    }

    /// queryContext returning the matched entities.
    ///
    /// Elements the broker reports as failed are skipped; the call only fails
    /// when nothing succeeded.
    #[tracing::instrument(skip(self, entities), fields(count = entities.len()))]
    pub async fn query_entities(&self, entities: &[Entity]) -> Result<Vec<Entity>> {
        let responses = self.query(entities).await?.context_responses()?;

        match responses.check() {
            Err(failure @ StatusFailure::Total(_)) => Err(failure.into()),
            Err(StatusFailure::Partial { total, failures }) => {
                tracing::warn!(total, failed = failures.len(), "Partial query result");
                Ok(responses.entities())
            }
            Ok(()) => Ok(responses.entities()),
        }
    }

    /// GET an arbitrary path below `/ngsi10/`. The suffix is sent verbatim.
    #[tracing::instrument(skip(self))]
    pub async fn custom_query(&self, suffix: &str) -> Result<RawResponse> {
        self.send_empty(Method::GET, suffix).await
    }

    async fn update_context(
        &self,
        entities: &[Entity],
        action: UpdateAction,
    ) -> Result<ContextResponses> {
        let request = UpdateContextRequest {
            context_elements: entities,
            update_action: action,
        };
        let response = self
            .send_json(Method::POST, "updateContext", &request)
            .await?;

        checked(response)
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> Result<RawResponse> {
        let payload = serde_json::to_string(body)?;
        self.execute(method, path, Some(payload)).await
    }

    async fn send_empty(&self, method: Method, path: &str) -> Result<RawResponse> {
        self.execute(method, path, None).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        payload: Option<String>,
    ) -> Result<RawResponse> {
        let url = self.url(path);

        if self.config.debug {
            tracing::info!(
                method = %method,
                url = %url,
                body = payload.as_deref().unwrap_or(""),
                "NGSI10 request"
            );
        } else {
            tracing::debug!(method = %method, url = %url, "NGSI10 request");
        }

        let mut request = self
            .client
            .request(method, &url)
            .header(ACCEPT, JSON_MIME)
            .header(CONTENT_TYPE, JSON_MIME);

        if let Some((user, password)) = self.config.basic_auth() {
            request = request.basic_auth(user, password);
        }

        if let Some(payload) = payload {
            request = request.body(payload);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if self.config.debug {
            tracing::info!(status, body = %body, "NGSI10 response");
        } else {
            tracing::debug!(status, "NGSI10 response");
        }

        Ok(RawResponse { status, body })
    }
}

/// Status check for updates: every element must succeed.
///
/// A non-2xx reply without a parseable body fails with the HTTP status, and a
/// reply that reports no element at all is never taken as success.
fn checked(raw: RawResponse) -> Result<ContextResponses> {
    let responses = match raw.context_responses() {
        Ok(responses) => responses,
        Err(ClientError::Protocol(_)) if !raw.is_success() => return Err(http_failure(&raw)),
        Err(e) => return Err(e),
    };

    if let Err(failure) = responses.check() {
        tracing::warn!(?failure, status = raw.status, "Broker reported failed status");
        return Err(ClientError::from(failure));
    }

    if responses.context_responses.is_empty() {
        tracing::warn!(status = raw.status, "Broker reply carries no context responses");
        if !raw.is_success() {
            return Err(http_failure(&raw));
        }
        return Err(ClientError::Application {
            code: raw.status.to_string(),
            reason: "no context responses in broker reply".to_string(),
        });
    }

    Ok(responses)
}

fn http_failure(raw: &RawResponse) -> ClientError {
    let reason = reqwest::StatusCode::from_u16(raw.status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown HTTP status");

    ClientError::Application {
        code: raw.status.to_string(),
        reason: reason.to_string(),
    }
}
