//! CRUD calls against one REST collection.

use hrm_domain::{ApiRequest, ApiResponse, DeleteRequest, RecordId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::HttpClient;

/// Rows come back wrapped as `{ "data": [...] }`.
#[derive(serde::Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct ListEnvelope<T> {
    #[serde(default)]
    data: Option<Vec<T>>,
}

/// Client for a collection endpoint such as `/branch`.
///
/// The client is normally the request authenticator, so every call carries
/// the session token.
#[derive(Debug)]
pub struct ResourceClient<C> {
    client: C,
    collection_url: String,
}

impl<C: HttpClient> ResourceClient<C> {
    /// Creates a client for `{base_url}/{collection}`.
    pub fn new(client: C, base_url: &str, collection: &str) -> Self {
        Self {
            client,
            collection_url: format!("{}/{collection}", base_url.trim_end_matches('/')),
        }
    }

    /// URL of the collection.
    #[must_use]
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    /// Fetches all rows. A response without `data` yields no rows.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn list<T: DeserializeOwned>(&self) -> ApplicationResult<Vec<T>> {
        let response = self.send(ApiRequest::get(&self.collection_url)).await?;
        let envelope: ListEnvelope<T> = response.json()?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Creates a record.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> ApplicationResult<ApiResponse> {
        self.send(ApiRequest::post(&self.collection_url).json(body)?)
            .await
    }

    /// Replaces the record `id`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        id: RecordId,
        body: &B,
    ) -> ApplicationResult<ApiResponse> {
        let url = format!("{}/{id}", self.collection_url);
        self.send(ApiRequest::put(url).json(body)?).await
    }

    /// Deletes the given records in one call.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn delete(&self, ids: Vec<RecordId>) -> ApplicationResult<ApiResponse> {
        let body = DeleteRequest { ids };
        self.send(ApiRequest::delete(&self.collection_url).json(&body)?)
            .await
    }

    async fn send(&self, request: ApiRequest) -> ApplicationResult<ApiResponse> {
        debug!(method = %request.method, url = %request.url, "calling API");
        let response = self.client.execute(request).await?;
        if !response.is_success() {
            return Err(ApplicationError::Http {
                status: response.status.as_u16(),
                body: response.text(),
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::testing::{Authorized, FakeApi};
    use hrm_domain::HttpMethod;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn client(api: &Arc<FakeApi>) -> ResourceClient<Authorized> {
        ResourceClient::new(Authorized(Arc::clone(api)), "http://api.test/", "branch")
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Row {
        id: i64,
    }

    #[tokio::test]
    async fn test_list_reads_data_envelope() {
        let api = Arc::new(FakeApi::accepting("t"));
        api.respond("http://api.test/branch", 200, json!({"data": [{"id": 1}, {"id": 2}]}));

        let rows: Vec<Row> = client(&api).list().await.unwrap();

        assert_eq!(rows, vec![Row { id: 1 }, Row { id: 2 }]);
    }

    #[tokio::test]
    async fn test_list_without_data_is_empty() {
        let api = Arc::new(FakeApi::accepting("t"));

        let rows: Vec<Row> = client(&api).list().await.unwrap();

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_urls() {
        let api = Arc::new(FakeApi::accepting("t"));
        let resource = client(&api);

        resource.update(7, &json!({"branchName": "Da Nang"})).await.unwrap();
        resource.delete(vec![1, 2]).await.unwrap();

        let requests = api.requests();
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[0].url, "http://api.test/branch/7");
        assert_eq!(requests[1].method, HttpMethod::Delete);
        assert_eq!(requests[1].url, "http://api.test/branch");
        let body: serde_json::Value =
            serde_json::from_slice(requests[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"ids": [1, 2]}));
    }

    #[tokio::test]
    async fn test_error_status_becomes_http_error() {
        let api = Arc::new(FakeApi::accepting("t"));
        api.respond("http://api.test/branch", 409, json!({"message": "conflict"}));

        let error = client(&api).create(&json!({})).await.unwrap_err();

        assert_eq!(error.status(), Some(409));
    }
}
