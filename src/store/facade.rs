use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::{DateTime, Datelike, Local, Timelike};
use log::{debug, info};

use super::models::{DownloadedFile, RemoteEntry, UploadedFileRecord};
use super::outcome::OperationOutcome;
use super::traits::RemoteStore;
use crate::path::{base_name, display_name, extension, normalize, with_trailing_slash};

/// Stateless adapter between the HTTP layer and a remote file store.
///
/// Every operation normalizes its path, delegates to the store, and turns
/// any error into a failed [`OperationOutcome`].
#[derive(Clone)]
pub struct RemoteStoreFacade {
    store: Arc<dyn RemoteStore>,
}

impl RemoteStoreFacade {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, path: Option<&str>) -> OperationOutcome<Vec<RemoteEntry>> {
        let path = normalize(path);
        let result = self.store.list(&path).await;
        log_failure("list", &path, &result);
        OperationOutcome::from_result(result, Vec::new())
    }

    pub async fn exists(&self, path: Option<&str>) -> OperationOutcome<bool> {
        let path = normalize(path);
        let result = self.store.exists(&path).await;
        log_failure("exists", &path, &result);
        OperationOutcome::from_result(result, false)
    }

    /// Creates `path` and any missing parents.
    ///
    /// Not atomic: directories created before a failing segment stay in place.
    pub async fn mkdir(&self, path: Option<&str>) -> OperationOutcome<Option<String>> {
        let path = normalize(path);
        let result = self.create_directories(&path).await.map(|_| path.clone());
        log_failure("mkdir", &path, &result);
        OperationOutcome::from_optional(result)
    }

    pub async fn delete(&self, path: Option<&str>) -> OperationOutcome<Option<String>> {
        let path = normalize(path);
        let result = self.store.delete(&path).await.map(|_| path.clone());
        log_failure("delete", &path, &result);
        OperationOutcome::from_optional(result)
    }

    pub async fn upload(
        &self,
        path: Option<&str>,
        content: Bytes,
        original_file_name: &str,
    ) -> OperationOutcome<Option<UploadedFileRecord>> {
        self.upload_at(path, content, original_file_name, Local::now())
            .await
    }

    /// Stores `content` under `path/YEAR/MONTH/DAY/` with a name derived from `now`.
    pub async fn upload_at(
        &self,
        path: Option<&str>,
        content: Bytes,
        original_file_name: &str,
        now: DateTime<Local>,
    ) -> OperationOutcome<Option<UploadedFileRecord>> {
        let path = normalize(path);
        let result = self
            .store_upload(&path, content, original_file_name, now)
            .await;
        log_failure("upload", &path, &result);
        OperationOutcome::from_optional(result)
    }

    pub async fn download(&self, path: Option<&str>) -> OperationOutcome<Option<DownloadedFile>> {
        let path = normalize(path);
        let result = self.store.get(&path).await.map(|content| DownloadedFile {
            file_name: display_name(&path).to_string(),
            content,
        });
        log_failure("download", &path, &result);
        OperationOutcome::from_optional(result)
    }

    async fn create_directories(&self, path: &str) -> Result<()> {
        let mut parent = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            parent.push('/');
            parent.push_str(segment);
            if !self.store.exists(&parent).await? {
                debug!("Creating remote directory {}/", parent);
                self.store
                    .create_directory(&format!("{}/", parent))
                    .await
                    .with_context(|| format!("无法创建目录 {}", parent))?;
            }
        }
        Ok(())
    }

    async fn store_upload(
        &self,
        path: &str,
        content: Bytes,
        original_file_name: &str,
        now: DateTime<Local>,
    ) -> Result<UploadedFileRecord> {
        let dir = format!(
            "{}{}/{}/{}/",
            with_trailing_slash(path),
            now.year(),
            now.month(),
            now.day()
        );
        if !self.store.exists(&dir).await? {
            self.create_directories(&dir).await?;
        }

        let original_file_name = base_name(original_file_name).to_string();
        let stored_file_name = stored_file_name(&original_file_name, &now);

        self.store
            .put(&format!("{}{}", dir, stored_file_name), content)
            .await?;
        Ok(UploadedFileRecord::new(
            now,
            stored_file_name,
            dir,
            original_file_name,
        ))
    }
}

/// `HOUR_MINUTE_SECOND_MILLIS[.ext]`, unpadded.
fn stored_file_name(original_file_name: &str, now: &DateTime<Local>) -> String {
    let millis = now.timestamp_subsec_millis() % 1000;
    let stem = format!(
        "{}_{}_{}_{}",
        now.hour(),
        now.minute(),
        now.second(),
        millis
    );
    match extension(original_file_name) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

fn log_failure<T>(operation: &str, path: &str, result: &Result<T>) {
    if let Err(e) = result {
        info!("{} {} failed: {:#}", operation, path, e);
    }
}
