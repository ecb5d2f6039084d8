//! reqwest-based ledger client speaking JSON over HTTPS with bearer auth.
//!
//! The REST mapping below is assumed, not a published service contract:
//!
//! | Operation | Request |
//! |---|---|
//! | open / create | `POST decisions` with `action` or `intent` |
//! | note | `POST decisions/{id}/notes` |
//! | read | `POST decisions/{id}/read` |
//! | evaluate | `POST decisions/{id}/evaluate` |
//! | request approval | `POST decisions/{id}/approvals` |
//! | write | `POST decisions/{id}/write` |
//! | trace / receipt | `GET decisions/{id}/trace`, `GET decisions/{id}/receipt` |
//! | close | `POST decisions/{id}/close` |
//! | products | `GET products[?purpose=]`, `GET products/{name}` |
//! | capabilities | `GET capabilities` |
//!
//! Deployments with a different layout should implement
//! [`LedgerClient`](crate::LedgerClient) directly.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tmcommon::DecisionId;

use crate::credentials::SecretString;
use crate::{
    ApprovalRequest, CloseRequest, DecisionHandle, EvaluateRequest, LedgerClient, LedgerError,
    LedgerFuture, NoteRequest, OpenOptions, ProductQuery, ReadRequest, WriteRequest,
};

use super::serde_api::{OpenDecisionBody, extract_error_message, parse_body, parse_decision_handle};

#[derive(Debug, Clone)]
pub struct LedgerHttpClient {
    client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl LedgerHttpClient {
    pub fn new(
        client: Client,
        api_key: SecretString,
        base_url: &str,
    ) -> Result<Self, LedgerError> {
        let base_url = Url::parse(base_url).map_err(|err| {
            LedgerError::configuration(format!("invalid ledger base url '{base_url}': {err}"))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(LedgerError::configuration(format!(
                "ledger base url '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, LedgerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LedgerError::configuration("ledger base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn decision_endpoint(&self, decision_id: &DecisionId, action: &str) -> Result<Url, LedgerError> {
        self.endpoint(&["decisions", decision_id.as_str(), action])
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(self.api_key.expose())
    }

    async fn send(builder: RequestBuilder) -> Result<Value, LedgerError> {
        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() || err.is_connect() {
                LedgerError::unavailable(err.to_string())
            } else {
                LedgerError::transport(err.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|err| LedgerError::transport(err.to_string()))?;
        parse_body(&body)
    }

    async fn post_json<B>(&self, url: Url, body: &B) -> Result<Value, LedgerError>
    where
        B: Serialize + ?Sized,
    {
        Self::send(self.request(Method::POST, url).json(body)).await
    }

    async fn get_json(&self, url: Url) -> Result<Value, LedgerError> {
        Self::send(self.request(Method::GET, url)).await
    }

    async fn open_with(&self, body: OpenDecisionBody<'_>) -> Result<DecisionHandle, LedgerError> {
        let url = self.endpoint(&["decisions"])?;
        let response = self.post_json(url, &body).await?;
        parse_decision_handle(response)
    }

    async fn parse_error(response: Response) -> LedgerError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("TraceMem request failed with status {status}"));

        error_for_status(status, message)
    }
}

pub(crate) fn error_for_status(status: StatusCode, message: String) -> LedgerError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LedgerError::authentication(message),
        StatusCode::NOT_FOUND => LedgerError::not_found(message),
        StatusCode::CONFLICT => LedgerError::conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            LedgerError::invalid_request(message)
        }
        StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::BAD_GATEWAY
        | StatusCode::GATEWAY_TIMEOUT
        | StatusCode::TOO_MANY_REQUESTS => LedgerError::unavailable(message),
        _ => LedgerError::transport(message),
    }
}

impl LedgerClient for LedgerHttpClient {
    fn open<'a>(
        &'a self,
        action: &'a str,
        options: OpenOptions,
    ) -> LedgerFuture<'a, Result<DecisionHandle, LedgerError>> {
        Box::pin(async move {
            self.open_with(OpenDecisionBody {
                action: Some(action),
                intent: None,
                options: &options,
            })
            .await
        })
    }

    fn create_decision<'a>(
        &'a self,
        intent: &'a str,
        options: OpenOptions,
    ) -> LedgerFuture<'a, Result<DecisionHandle, LedgerError>> {
        Box::pin(async move {
            self.open_with(OpenDecisionBody {
                action: None,
                intent: Some(intent),
                options: &options,
            })
            .await
        })
    }

    fn note<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: NoteRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>> {
        Box::pin(async move {
            let url = self.decision_endpoint(decision_id, "notes")?;
            self.post_json(url, &request).await.map(|_| ())
        })
    }

    fn read<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: ReadRequest,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let url = self.decision_endpoint(decision_id, "read")?;
            self.post_json(url, &request).await
        })
    }

    fn evaluate<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: EvaluateRequest,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let url = self.decision_endpoint(decision_id, "evaluate")?;
            self.post_json(url, &request).await
        })
    }

    fn request_approval<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: ApprovalRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>> {
        Box::pin(async move {
            let url = self.decision_endpoint(decision_id, "approvals")?;
            self.post_json(url, &request).await.map(|_| ())
        })
    }

    fn write<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: WriteRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>> {
        Box::pin(async move {
            let url = self.decision_endpoint(decision_id, "write")?;
            self.post_json(url, &request).await.map(|_| ())
        })
    }

    fn trace<'a>(
        &'a self,
        decision_id: &'a DecisionId,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let url = self.decision_endpoint(decision_id, "trace")?;
            self.get_json(url).await
        })
    }

    fn receipt<'a>(
        &'a self,
        decision_id: &'a DecisionId,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let url = self.decision_endpoint(decision_id, "receipt")?;
            self.get_json(url).await
        })
    }

    fn close<'a>(
        &'a self,
        decision_id: &'a DecisionId,
        request: CloseRequest,
    ) -> LedgerFuture<'a, Result<(), LedgerError>> {
        Box::pin(async move {
            let url = self.decision_endpoint(decision_id, "close")?;
            self.post_json(url, &request).await.map(|_| ())
        })
    }

    fn list_products<'a>(
        &'a self,
        query: ProductQuery,
    ) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let mut url = self.endpoint(&["products"])?;
            if let Some(purpose) = query.purpose.as_deref() {
                url.query_pairs_mut().append_pair("purpose", purpose);
            }
            self.get_json(url).await
        })
    }

    fn get_product<'a>(&'a self, name: &'a str) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let url = self.endpoint(&["products", name])?;
            self.get_json(url).await
        })
    }

    fn capabilities<'a>(&'a self) -> LedgerFuture<'a, Result<Value, LedgerError>> {
        Box::pin(async move {
            let url = self.endpoint(&["capabilities"])?;
            self.get_json(url).await
        })
    }
}
