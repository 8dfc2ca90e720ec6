//! HTTP client wrapper - the three backend calls
//!
//! No retry and no auth. Non-2xx responses are errors.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::constants::{CREATE_USER_PATH, GET_USERS_PATH, RESUME_MIME};
use crate::error::TransportError;
use crate::models::{Registration, UserRecord};

/// Client bound to one backend base URL
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        ApiClient {
            http: create_client(config.request_timeout),
            base_url: config.base_url.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::Request(format!("bad endpoint {}: {}", path, e)))
    }

    /// `GET /registration/user/get-user`
    pub async fn fetch_users(&self) -> Result<Vec<UserRecord>, TransportError> {
        let url = self.endpoint(GET_USERS_PATH)?;
        let start = Instant::now();
        let resp = self.http.get(url).send().await?.error_for_status()?;
        let users = resp.json::<Vec<UserRecord>>().await?;
        tracing::debug!(count = users.len(), time_ms = start.elapsed().as_millis() as u64, "Fetched users");
        Ok(users)
    }

    /// `POST /registration/user/create` as multipart form data
    pub async fn create_user(&self, registration: &Registration) -> Result<(), TransportError> {
        let url = self.endpoint(CREATE_USER_PATH)?;
        let resume = tokio::fs::read(&registration.resume.path).await?;
        let form = build_registration_form(registration, resume)?;

        let start = Instant::now();
        let resp = self.http.post(url).multipart(form).send().await?;
        let status = resp.status();
        tracing::debug!(status = status.as_u16(), time_ms = start.elapsed().as_millis() as u64, "Registration POST answered");
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16() });
        }
        Ok(())
    }

    /// Stream `url` into `destination`, never overwriting an existing file.
    /// Returns the path actually written.
    pub async fn download(&self, url: Url, destination: &Path) -> Result<PathBuf, TransportError> {
        let resp = self.http.get(url).send().await?.error_for_status()?;

        if let Some(dir) = destination.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }
        let (path, mut file) = create_unique(destination).await?;

        let mut stream = resp.bytes_stream();
        let mut total_bytes = 0usize;
        let written = async {
            while let Some(chunk) = stream.next().await {
                let bytes = chunk?;
                file.write_all(&bytes).await?;
                total_bytes += bytes.len();
            }
            file.flush().await?;
            Ok::<(), TransportError>(())
        }
        .await;
        drop(file);

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e);
        }

        tracing::debug!(path = %path.display(), total_bytes, "Download complete");
        Ok(path)
    }
}

/// Text parts in wire order, then the resume as a binary part
pub fn build_registration_form(
    registration: &Registration,
    resume: Vec<u8>,
) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (name, value) in registration.text_fields() {
        form = form.text(name, value);
    }
    let part = Part::bytes(resume)
        .file_name(registration.resume.file_name.clone())
        .mime_str(RESUME_MIME)?;
    Ok(form.part("resume", part))
}

/// Atomically create `dir/name.ext`, or `dir/name (n).ext` for the first
/// n that does not exist yet
async fn create_unique(destination: &Path) -> Result<(PathBuf, tokio::fs::File), TransportError> {
    let mut n = 0;
    loop {
        let candidate = numbered(destination, n);
        let opened = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await;
        match opened {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// `name.ext` for 0, `name (n).ext` otherwise
fn numbered(destination: &Path, n: usize) -> PathBuf {
    if n == 0 {
        return destination.to_path_buf();
    }
    let stem = destination
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = destination
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    destination.with_file_name(format!("{} ({}){}", stem, n, ext))
}

/// Create an HTTP client with the configured timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_unique_never_reuses_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resume.docx");

        let (first, _f1) = create_unique(&target).await.unwrap();
        assert_eq!(first, target);

        let (second, _f2) = create_unique(&target).await.unwrap();
        assert_eq!(second, dir.path().join("resume (1).docx"));

        let (third, _f3) = create_unique(&target).await.unwrap();
        assert_eq!(third, dir.path().join("resume (2).docx"));
    }

    #[tokio::test]
    async fn test_create_unique_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resume.docx");
        std::fs::write(&target, b"original").unwrap();

        let (path, _file) = create_unique(&target).await.unwrap();
        assert_eq!(path, dir.path().join("resume (1).docx"));
        assert_eq!(std::fs::read(&target).unwrap(), b"original");
    }

    #[test]
    fn test_endpoints_join_base() {
        let config = Config {
            base_url: Url::parse("https://example.com/api/").unwrap(),
            download_dir: PathBuf::from("."),
            log_file: PathBuf::from("test.log"),
            request_timeout: Duration::from_secs(1),
        };
        let client = ApiClient::new(&config);
        assert_eq!(
            client.endpoint(CREATE_USER_PATH).unwrap().as_str(),
            "https://example.com/api/registration/user/create"
        );
    }
}
