//! GitHub Releases backend for `ReportStore`.
//!
//! Flow per upload: check token → pick release (most recent, or create the configured
//! tag when none exist) → multipart POST to the asset upload endpoint → read
//! `browser_download_url`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::release::ReportStore;

const USER_AGENT: &str = concat!("career-report-api/", env!("CARGO_PKG_VERSION"));
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const RELEASE_BODY: &str = "Automated career report releases";

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
}

#[derive(Debug, Serialize)]
struct CreateRelease<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadedAsset {
    browser_download_url: String,
}

pub struct GithubReleaseStore {
    client: Client,
    token: Option<String>,
    repository: String,
    api_url: String,
    uploads_url: String,
    release_tag: String,
    release_name: String,
}

impl GithubReleaseStore {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.github_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            token: config.github_token.clone(),
            repository: config.github_repository.clone(),
            api_url: config.github_api_url.clone(),
            uploads_url: config.github_uploads_url.clone(),
            release_tag: config.release_tag.clone(),
            release_name: config.release_name.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
    }

    /// Most recent release, or a freshly created one when the repository has none.
    ///
    /// Creation is create-if-absent: if another request created the tag between our
    /// listing and our create call, GitHub answers 422 and we fetch that release by tag.
    async fn ensure_release(&self, token: &str) -> Result<Release, AppError> {
        let url = format!("{}/repos/{}/releases", self.api_url, self.repository);
        let response = self
            .authorized(self.client.get(&url), token)
            .query(&[("per_page", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GitHub(format!(
                "listing releases returned {status}: {body}"
            )));
        }

        let releases: Vec<Release> = response.json().await?;
        if let Some(latest) = releases.into_iter().next() {
            return Ok(latest);
        }

        info!(
            "No releases in {}; creating {} ({})",
            self.repository, self.release_tag, self.release_name
        );
        let response = self
            .authorized(self.client.post(&url), token)
            .json(&CreateRelease {
                tag_name: &self.release_tag,
                name: &self.release_name,
                body: RELEASE_BODY,
            })
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(response.json().await?),
            StatusCode::UNPROCESSABLE_ENTITY => {
                warn!(
                    "Release {} already exists; using the existing one",
                    self.release_tag
                );
                self.release_by_tag(token).await
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::GitHub(format!(
                    "creating release returned {status}: {body}"
                )))
            }
        }
    }

    async fn release_by_tag(&self, token: &str) -> Result<Release, AppError> {
        let url = format!(
            "{}/repos/{}/releases/tags/{}",
            self.api_url, self.repository, self.release_tag
        );
        let response = self.authorized(self.client.get(&url), token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GitHub(format!(
                "fetching release {} returned {status}: {body}",
                self.release_tag
            )));
        }
        Ok(response.json().await?)
    }

    async fn upload_asset(
        &self,
        token: &str,
        release: &Release,
        filename: &str,
        pdf: Bytes,
    ) -> Result<String, AppError> {
        let url = format!(
            "{}/repos/{}/releases/{}/assets",
            self.uploads_url, self.repository, release.id
        );
        let length = pdf.len() as u64;
        let part = multipart::Part::stream_with_length(pdf, length)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .authorized(self.client.post(&url), token)
            .query(&[("name", filename)])
            .multipart(form)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upload(body));
        }

        let asset: UploadedAsset = response.json().await?;
        Ok(asset.browser_download_url)
    }
}

#[async_trait]
impl ReportStore for GithubReleaseStore {
    async fn upload(&self, filename: &str, pdf: Bytes) -> Result<String, AppError> {
        let token = self.token.as_deref().ok_or_else(|| {
            AppError::Configuration("Missing GITHUB_TOKEN in environment variables".to_string())
        })?;

        let release = self.ensure_release(token).await?;
        info!(
            "Uploading {} ({} bytes) to release {} ({})",
            filename,
            pdf.len(),
            release.id,
            release.tag_name
        );

        let url = self.upload_asset(token, &release, filename, pdf).await?;
        info!("Uploaded report asset: {url}");
        Ok(url)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::extract::{Multipart, Path, Query, State};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    /// In-process stand-in for the GitHub API and uploads host.
    #[derive(Default)]
    pub(crate) struct FakeGithub {
        pub releases: Mutex<Vec<Value>>,
        pub create_conflict: bool,
        pub list_status: Option<AxumStatus>,
        pub create_status: Option<AxumStatus>,
        pub upload_status: Option<AxumStatus>,
        pub list_hits: AtomicUsize,
        pub create_hits: AtomicUsize,
        pub tag_hits: AtomicUsize,
        pub upload_hits: AtomicUsize,
        pub uploaded: Mutex<Vec<(String, String, String, usize)>>,
        pub auth_headers: Mutex<Vec<String>>,
    }

    impl FakeGithub {
        pub(crate) fn total_hits(&self) -> usize {
            self.list_hits.load(Ordering::SeqCst)
                + self.create_hits.load(Ordering::SeqCst)
                + self.tag_hits.load(Ordering::SeqCst)
                + self.upload_hits.load(Ordering::SeqCst)
        }
    }

    fn record_auth(fake: &FakeGithub, headers: &axum::http::HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        fake.auth_headers.lock().unwrap().push(value);
    }

    async fn list_releases(
        State(fake): State<Arc<FakeGithub>>,
        headers: axum::http::HeaderMap,
    ) -> (AxumStatus, Json<Value>) {
        fake.list_hits.fetch_add(1, Ordering::SeqCst);
        record_auth(&fake, &headers);
        if let Some(status) = fake.list_status {
            return (status, Json(json!({"message": "Not Found"})));
        }
        let releases = fake.releases.lock().unwrap().clone();
        (AxumStatus::OK, Json(Value::Array(releases)))
    }

    async fn create_release(
        State(fake): State<Arc<FakeGithub>>,
        Json(body): Json<Value>,
    ) -> (AxumStatus, Json<Value>) {
        fake.create_hits.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = fake.create_status {
            return (status, Json(json!({"message": "Resource not accessible by integration"})));
        }
        if fake.create_conflict {
            return (
                AxumStatus::UNPROCESSABLE_ENTITY,
                Json(json!({"message": "Validation Failed", "errors": [{"code": "already_exists"}]})),
            );
        }
        let release = json!({"id": 77, "tag_name": body["tag_name"], "name": body["name"]});
        fake.releases.lock().unwrap().insert(0, release.clone());
        (AxumStatus::CREATED, Json(release))
    }

    async fn release_by_tag(
        State(fake): State<Arc<FakeGithub>>,
        Path((_owner, _repo, tag)): Path<(String, String, String)>,
    ) -> Json<Value> {
        fake.tag_hits.fetch_add(1, Ordering::SeqCst);
        Json(json!({"id": 91, "tag_name": tag}))
    }

    async fn upload_asset(
        State(fake): State<Arc<FakeGithub>>,
        Path((_owner, _repo, id)): Path<(String, String, u64)>,
        Query(query): Query<HashMap<String, String>>,
        mut multipart: Multipart,
    ) -> (AxumStatus, Json<Value>) {
        fake.upload_hits.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = fake.upload_status {
            return (status, Json(json!({"message": "Bad Credentials"})));
        }

        let name = query.get("name").cloned().unwrap_or_default();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let field_name = field.name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let file_name = field.file_name().unwrap_or_default().to_string();
            let len = field.bytes().await.unwrap().len();
            assert_eq!(field_name, "file");
            assert_eq!(file_name, name);
            fake.uploaded
                .lock()
                .unwrap()
                .push((name.clone(), file_name, content_type, len));
        }

        (
            AxumStatus::CREATED,
            Json(json!({
                "id": 1,
                "name": name,
                "browser_download_url": format!("https://github.com/octo/reports/releases/download/{id}/{name}")
            })),
        )
    }

    /// Starts the fake on 127.0.0.1 and returns its base URL.
    /// The uploads host is served under `/uploads` on the same listener.
    pub(crate) async fn spawn_fake_github(fake: Arc<FakeGithub>) -> String {
        let app = Router::new()
            .route(
                "/repos/:owner/:repo/releases",
                get(list_releases).post(create_release),
            )
            .route("/repos/:owner/:repo/releases/tags/:tag", get(release_by_tag))
            .route(
                "/uploads/repos/:owner/:repo/releases/:id/assets",
                post(upload_asset),
            )
            .with_state(fake);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    pub(crate) fn store_for(base_url: &str, token: Option<&str>) -> GithubReleaseStore {
        GithubReleaseStore {
            client: Client::builder().user_agent(USER_AGENT).build().unwrap(),
            token: token.map(str::to_string),
            repository: "octo/reports".to_string(),
            api_url: base_url.to_string(),
            uploads_url: format!("{base_url}/uploads"),
            release_tag: "v1.0.0".to_string(),
            release_name: "Career Reports".to_string(),
        }
    }

    fn pdf() -> Bytes {
        Bytes::from_static(b"%PDF-1.5 fake")
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_any_call() {
        let fake = Arc::new(FakeGithub::default());
        let base = spawn_fake_github(fake.clone()).await;

        let err = store_for(&base, None)
            .upload("A_Career_Report.pdf", pdf())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Configuration(ref m) if m == "Missing GITHUB_TOKEN in environment variables"));
        assert_eq!(fake.total_hits(), 0);
    }

    #[tokio::test]
    async fn test_creates_release_when_none_exist() {
        let fake = Arc::new(FakeGithub::default());
        let base = spawn_fake_github(fake.clone()).await;

        let url = store_for(&base, Some("t0k"))
            .upload("A_Career_Report.pdf", pdf())
            .await
            .unwrap();

        assert_eq!(
            url,
            "https://github.com/octo/reports/releases/download/77/A_Career_Report.pdf"
        );
        assert_eq!(fake.create_hits.load(Ordering::SeqCst), 1);
        let releases = fake.releases.lock().unwrap();
        assert_eq!(releases[0]["tag_name"], "v1.0.0");
        assert_eq!(releases[0]["name"], "Career Reports");
    }

    #[tokio::test]
    async fn test_reuses_most_recent_release() {
        let fake = Arc::new(FakeGithub {
            releases: Mutex::new(vec![
                json!({"id": 5, "tag_name": "v2.0.0"}),
                json!({"id": 4, "tag_name": "v1.0.0"}),
            ]),
            ..Default::default()
        });
        let base = spawn_fake_github(fake.clone()).await;

        let url = store_for(&base, Some("t0k"))
            .upload("B.pdf", pdf())
            .await
            .unwrap();

        assert!(url.contains("/download/5/B.pdf"), "{url}");
        assert_eq!(fake.create_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_conflict_falls_back_to_tag_lookup() {
        let fake = Arc::new(FakeGithub {
            create_conflict: true,
            ..Default::default()
        });
        let base = spawn_fake_github(fake.clone()).await;

        let url = store_for(&base, Some("t0k"))
            .upload("C.pdf", pdf())
            .await
            .unwrap();

        assert!(url.contains("/download/91/C.pdf"), "{url}");
        assert_eq!(fake.tag_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_pdf_with_bearer_token() {
        let fake = Arc::new(FakeGithub::default());
        let base = spawn_fake_github(fake.clone()).await;

        store_for(&base, Some("t0k"))
            .upload("D_Career_Report.pdf", pdf())
            .await
            .unwrap();

        let uploaded = fake.uploaded.lock().unwrap();
        assert_eq!(uploaded.len(), 1);
        let (name, file_name, content_type, len) = &uploaded[0];
        assert_eq!(name, "D_Career_Report.pdf");
        assert_eq!(file_name, "D_Career_Report.pdf");
        assert_eq!(content_type, "application/pdf");
        assert_eq!(*len, pdf().len());
        assert!(fake
            .auth_headers
            .lock()
            .unwrap()
            .iter()
            .all(|h| h == "Bearer t0k"));
    }

    #[tokio::test]
    async fn test_non_201_upload_surfaces_remote_body() {
        let fake = Arc::new(FakeGithub {
            upload_status: Some(AxumStatus::UNAUTHORIZED),
            ..Default::default()
        });
        let base = spawn_fake_github(fake.clone()).await;

        let err = store_for(&base, Some("t0k"))
            .upload("E.pdf", pdf())
            .await
            .unwrap_err();

        match err {
            AppError::Upload(body) => assert!(body.contains("Bad Credentials"), "{body}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_200_upload_is_still_a_failure() {
        let fake = Arc::new(FakeGithub {
            upload_status: Some(AxumStatus::OK),
            ..Default::default()
        });
        let base = spawn_fake_github(fake.clone()).await;

        let err = store_for(&base, Some("t0k"))
            .upload("F.pdf", pdf())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upload(_)));
    }

    #[tokio::test]
    async fn test_failed_listing_surfaces_status_and_body() {
        let fake = Arc::new(FakeGithub {
            list_status: Some(AxumStatus::NOT_FOUND),
            ..Default::default()
        });
        let base = spawn_fake_github(fake.clone()).await;

        let err = store_for(&base, Some("t0k"))
            .upload("G.pdf", pdf())
            .await
            .unwrap_err();

        match err {
            AppError::GitHub(msg) => {
                assert!(msg.starts_with("listing releases returned 404"), "{msg}");
                assert!(msg.contains("Not Found"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fake.create_hits.load(Ordering::SeqCst), 0);
        assert_eq!(fake.upload_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_create_surfaces_status_and_body() {
        let fake = Arc::new(FakeGithub {
            create_status: Some(AxumStatus::FORBIDDEN),
            ..Default::default()
        });
        let base = spawn_fake_github(fake.clone()).await;

        let err = store_for(&base, Some("t0k"))
            .upload("H.pdf", pdf())
            .await
            .unwrap_err();

        match err {
            AppError::GitHub(msg) => {
                assert!(msg.starts_with("creating release returned 403"), "{msg}");
                assert!(msg.contains("Resource not accessible by integration"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fake.tag_hits.load(Ordering::SeqCst), 0);
        assert_eq!(fake.upload_hits.load(Ordering::SeqCst), 0);
    }
}
