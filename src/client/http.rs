//! reqwest implementation of [`SnapperApi`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use super::{
    ClientError, SnapperApi, StorageProfile, StorageProfileRequest, Target, TargetRequest,
};

const TARGETS_PATH: &str = "/targets";
const STORAGE_PROFILES_PATH: &str = "/storage_profiles";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the DBSnapper API, authenticated with a bearer token.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    authtoken: String,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Build a client for `base_url` (e.g. `https://app.dbsnapper.com/api/v3`).
    pub fn new(base_url: &str, authtoken: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("dbsnapper-provider/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authtoken: authtoken.to_string(),
        })
    }

    /// The base URL all request paths are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.authtoken)
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, ClientError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        debug!(path, status = status.as_u16(), "DBSnapper API response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(path.to_string()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized(body),
            _ => ClientError::Api {
                status: status.as_u16(),
                body,
            },
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ClientError> {
        let response = self.send(request, path).await?;
        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send_json(self.client.get(self.url(path)), path).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send_json(self.client.post(self.url(path)).json(body), path)
            .await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send_json(self.client.put(self.url(path)).json(body), path)
            .await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.client.delete(self.url(path)), path).await?;
        Ok(())
    }
}

fn target_path(id: Uuid) -> String {
    format!("{}/{}", TARGETS_PATH, id)
}

fn storage_profile_path(id: Uuid) -> String {
    format!("{}/{}", STORAGE_PROFILES_PATH, id)
}

#[async_trait::async_trait]
impl SnapperApi for HttpClient {
    async fn create_target(&self, request: &TargetRequest) -> Result<Target, ClientError> {
        self.post(TARGETS_PATH, request).await
    }

    async fn get_target(&self, id: Uuid) -> Result<Target, ClientError> {
        self.get(&target_path(id)).await
    }

    async fn update_target(
        &self,
        id: Uuid,
        request: &TargetRequest,
    ) -> Result<Target, ClientError> {
        self.put(&target_path(id), request).await
    }

    async fn delete_target(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&target_path(id)).await
    }

    async fn list_targets(&self) -> Result<Vec<Target>, ClientError> {
        self.get(TARGETS_PATH).await
    }

    async fn create_storage_profile(
        &self,
        request: &StorageProfileRequest,
    ) -> Result<StorageProfile, ClientError> {
        self.post(STORAGE_PROFILES_PATH, request).await
    }

    async fn get_storage_profile(&self, id: Uuid) -> Result<StorageProfile, ClientError> {
        self.get(&storage_profile_path(id)).await
    }

    async fn update_storage_profile(
        &self,
        id: Uuid,
        request: &StorageProfileRequest,
    ) -> Result<StorageProfile, ClientError> {
        self.put(&storage_profile_path(id), request).await
    }

    async fn delete_storage_profile(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&storage_profile_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SnapshotRequest;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TARGET_ID: &str = "0b6f5a6e-1c2d-4e3f-8a9b-0c1d2e3f4a5b";

    fn target_body(name: &str) -> serde_json::Value {
        json!({
            "id": TARGET_ID,
            "name": name,
            "status": "ready",
            "messages": "",
            "snapshot": {"src_url": "postgres://src", "dst_url": "postgres://dst", "src_bytes": 4096},
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_create_target_posts_json_with_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v3/targets"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(body_partial_json(json!({"name": "tf_test"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(target_body("tf_test")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client =
            HttpClient::new(&format!("{}/api/v3/", mock_server.uri()), "secret-token").unwrap();
        let request = TargetRequest {
            name: "tf_test".to_string(),
            snapshot: SnapshotRequest {
                src_url: "postgres://src".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let target = client.create_target(&request).await.unwrap();
        assert_eq!(target.id.to_string(), TARGET_ID);
        assert_eq!(target.snapshot.src_bytes, 4096);
    }

    #[tokio::test]
    async fn test_get_target_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/targets/{}", TARGET_ID)))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such target"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&mock_server.uri(), "token").unwrap();
        let err = client
            .get_target(TARGET_ID.parse().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::NotFound(p) if p == format!("/targets/{}", TARGET_ID)));
    }

    #[tokio::test]
    async fn test_server_error_carries_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(format!("/storage_profiles/{}", TARGET_ID)))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&mock_server.uri(), "token").unwrap();
        let err = client
            .delete_storage_profile(TARGET_ID.parse().unwrap())
            .await
            .unwrap_err();

        match err {
            ClientError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/targets"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&mock_server.uri(), "wrong").unwrap();
        let err = client.list_targets().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_list_targets_keeps_service_order() {
        let mock_server = MockServer::start().await;

        let mut second = target_body("tf_target_2");
        second["id"] = json!("7d1f0c2a-9b8e-4c3d-a2f1-0e9d8c7b6a59");
        Mock::given(method("GET"))
            .and(path("/targets"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([target_body("tf_target_1"), second])),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&mock_server.uri(), "token").unwrap();
        let targets = client.list_targets().await.unwrap();
        let names: Vec<_> = targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["tf_target_1", "tf_target_2"]);
    }

    #[tokio::test]
    async fn test_update_storage_profile_puts_to_identity_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(format!("/storage_profiles/{}", TARGET_ID)))
            .and(body_partial_json(json!({"provider": "s3", "bucket": "tf-test-bucket-updated"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": TARGET_ID,
                "name": "tf_test_storage_profile_update",
                "provider": "s3",
                "bucket": "tf-test-bucket-updated",
                "status": "active"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&mock_server.uri(), "token").unwrap();
        let request = StorageProfileRequest {
            name: "tf_test_storage_profile_update".to_string(),
            provider: "s3".to_string(),
            bucket: "tf-test-bucket-updated".to_string(),
            ..Default::default()
        };

        let profile = client
            .update_storage_profile(TARGET_ID.parse().unwrap(), &request)
            .await
            .unwrap();
        assert_eq!(profile.status, "active");
        assert_eq!(profile.bucket, "tf-test-bucket-updated");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpClient::new("not a url", "token").unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));

        let err = HttpClient::new("ftp://app.dbsnapper.com", "token").unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpClient::new("https://app.dbsnapper.com/api/v3/", "token").unwrap();
        assert_eq!(client.base_url(), "https://app.dbsnapper.com/api/v3");
        assert!(!format!("{:?}", client).contains("token"));
    }
}
