use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Datelike, Local, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use warp::http::StatusCode;
use warp::Filter;
use webdav_gateway::path::{file_name, normalize};
use webdav_gateway::store::RemoteEntry;
use webdav_gateway::web::api;
use webdav_gateway::{RemoteStore, RemoteStoreFacade};

const BOUNDARY: &str = "gateway-test-boundary";

/// WebDAV-like store kept in memory; parents must exist, like MKCOL and PUT.
#[derive(Default)]
struct MemoryStore {
    dirs: Mutex<BTreeSet<String>>,
    files: Mutex<BTreeMap<String, Bytes>>,
}

impl MemoryStore {
    fn new() -> Self {
        let store = Self::default();
        store.dirs.lock().unwrap().insert("/".to_string());
        store
    }

    fn key(path: &str) -> String {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        }
    }

    fn parent(key: &str) -> String {
        match key.rsplit_once('/') {
            Some(("", _)) | None => "/".to_string(),
            Some((parent, _)) => parent.to_string(),
        }
    }

    fn has_dir(&self, key: &str) -> bool {
        self.dirs.lock().unwrap().contains(key)
    }

    fn file(&self, path: &str) -> Option<Bytes> {
        self.files.lock().unwrap().get(path).cloned()
    }

    fn entry(key: &str, is_directory: bool, size: u64) -> RemoteEntry {
        RemoteEntry {
            name: file_name(key).to_string(),
            path: key.to_string(),
            href: key.to_string(),
            is_directory,
            size,
            last_modified: Utc::now(),
            content_type: None,
            etag: None,
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let key = Self::key(path);
        if !self.has_dir(&key) {
            return Err(anyhow!("404 Not Found"));
        }
        let mut entries = vec![Self::entry(&key, true, 0)];
        for dir in self.dirs.lock().unwrap().iter() {
            if dir != &key && Self::parent(dir) == key {
                entries.push(Self::entry(dir, true, 0));
            }
        }
        for (file, content) in self.files.lock().unwrap().iter() {
            if Self::parent(file) == key {
                entries.push(Self::entry(file, false, content.len() as u64));
            }
        }
        Ok(entries)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let key = Self::key(path);
        Ok(self.has_dir(&key) || self.files.lock().unwrap().contains_key(&key))
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        let key = Self::key(path);
        if !self.has_dir(&Self::parent(&key)) {
            return Err(anyhow!("409 Conflict"));
        }
        if !self.dirs.lock().unwrap().insert(key) {
            return Err(anyhow!("405 Method Not Allowed"));
        }
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let key = Self::key(path);
        if self.files.lock().unwrap().remove(&key).is_some() {
            return Ok(());
        }
        let mut dirs = self.dirs.lock().unwrap();
        if !dirs.remove(&key) {
            return Err(anyhow!("404 Not Found"));
        }
        let prefix = format!("{}/", key);
        dirs.retain(|d| !d.starts_with(&prefix));
        self.files
            .lock()
            .unwrap()
            .retain(|f, _| !f.starts_with(&prefix));
        Ok(())
    }

    async fn put(&self, path: &str, content: Bytes) -> Result<()> {
        if !self.has_dir(&Self::parent(path)) {
            return Err(anyhow!("409 Conflict"));
        }
        self.files.lock().unwrap().insert(path.to_string(), content);
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Bytes> {
        self.file(path).ok_or_else(|| anyhow!("404 Not Found"))
    }
}

fn setup() -> (
    Arc<MemoryStore>,
    impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone,
) {
    let store = Arc::new(MemoryStore::new());
    let facade = Arc::new(RemoteStoreFacade::new(store.clone()));
    (store, api(facade, 1024 * 1024))
}

fn date_dir(base: &str, now: DateTime<Local>) -> String {
    format!("{}{}/{}/{}/", base, now.year(), now.month(), now.day())
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

fn multipart_body(path: Option<&str>, file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(path) = path {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"path\"\r\n\r\n{}\r\n",
                BOUNDARY, path
            )
            .as_bytes(),
        );
    }
    if let Some((name, content)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[tokio::test]
async fn test_mkdir_then_list_and_exists() {
    let (_, routes) = setup();

    let response = warp::test::request()
        .method("POST")
        .path("/store/mkdir")
        .json(&serde_json::json!({ "path": "a/b/c" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json(response.body()),
        serde_json::json!({ "resCode": "0000", "data": "/a/b/c", "msg": "" })
    );

    let response = warp::test::request()
        .path("/store/exists?path=/a/b")
        .reply(&routes)
        .await;
    assert_eq!(
        json(response.body()),
        serde_json::json!({ "resCode": "0000", "data": true, "msg": "" })
    );

    let response = warp::test::request()
        .path("/store/exists?path=x")
        .reply(&routes)
        .await;
    assert_eq!(json(response.body())["data"], false);

    let response = warp::test::request()
        .path("/store/list?path=a")
        .reply(&routes)
        .await;
    let body = json(response.body());
    assert_eq!(body["resCode"], "0000");
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["name"], "b");
    assert_eq!(entries[1]["isDirectory"], true);
}

#[tokio::test]
async fn test_mkdir_is_idempotent() {
    let (store, routes) = setup();
    for _ in 0..2 {
        let response = warp::test::request()
            .method("POST")
            .path("/store/mkdir")
            .json(&serde_json::json!({ "path": "/x/y" }))
            .reply(&routes)
            .await;
        assert_eq!(json(response.body())["resCode"], "0000");
    }
    assert!(store.has_dir("/x/y"));
}

#[tokio::test]
async fn test_list_missing_directory_fails() {
    let (_, routes) = setup();
    let response = warp::test::request()
        .path("/store/list?path=/nope")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json(response.body()),
        serde_json::json!({ "resCode": "0001", "data": [], "msg": "404 Not Found" })
    );
}

#[tokio::test]
async fn test_delete() {
    let (store, routes) = setup();
    store.dirs.lock().unwrap().insert("/docs".to_string());
    store
        .files
        .lock()
        .unwrap()
        .insert("/docs/a.txt".to_string(), Bytes::from_static(b"a"));

    let response = warp::test::request()
        .method("DELETE")
        .path("/store/delete?path=docs/a.txt")
        .reply(&routes)
        .await;
    assert_eq!(
        json(response.body()),
        serde_json::json!({ "resCode": "0000", "data": "/docs/a.txt", "msg": "" })
    );
    assert!(store.file("/docs/a.txt").is_none());

    let response = warp::test::request()
        .method("DELETE")
        .path("/store/delete?path=docs/a.txt")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response.body());
    assert_eq!(body["resCode"], "0001");
    assert_eq!(body["data"], Value::Null);
    assert!(!body["msg"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_then_download() {
    let (store, routes) = setup();

    let before = Local::now();
    let response = warp::test::request()
        .method("POST")
        .path("/store/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(multipart_body(Some("docs"), Some(("notes.txt", b"hello webdav"))))
        .reply(&routes)
        .await;
    let after = Local::now();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response.body());
    assert_eq!(body["resCode"], "0000", "{}", body);

    let record = &body["data"];
    let stored_path = record["storedPath"].as_str().unwrap();
    let stored_file_name = record["storedFileName"].as_str().unwrap();
    assert!(
        stored_path == date_dir("/docs/", before) || stored_path == date_dir("/docs/", after),
        "{}",
        stored_path
    );
    assert!(stored_file_name.ends_with(".txt"));
    assert_eq!(stored_file_name.matches('_').count(), 3);
    assert_eq!(record["originalFileName"], "notes.txt");
    assert_eq!(record["createTime"], record["updateTime"]);

    let full_path = format!("{}{}", stored_path, stored_file_name);
    assert_eq!(
        store.file(&full_path),
        Some(Bytes::from_static(b"hello webdav"))
    );

    let response = warp::test::request()
        .path(&format!("/store/download?path={}", full_path))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/octet-stream"
    );
    assert_eq!(
        response.headers()["content-disposition"],
        format!(
            "attachment; filename=\"{0}\"; filename*=UTF-8''{0}",
            stored_file_name
        )
        .as_str()
    );
    assert_eq!(response.body().as_ref(), b"hello webdav");
}

#[tokio::test]
async fn test_upload_to_root_without_path_field() {
    let (store, routes) = setup();
    let response = warp::test::request()
        .method("POST")
        .path("/store/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(multipart_body(None, Some(("Makefile", b"all:"))))
        .reply(&routes)
        .await;
    let body = json(response.body());
    assert_eq!(body["resCode"], "0000");
    let stored_file_name = body["data"]["storedFileName"].as_str().unwrap();
    assert!(!stored_file_name.contains('.'));
    let stored_path = body["data"]["storedPath"].as_str().unwrap();
    assert_eq!(normalize(Some(stored_path)), stored_path);
    assert!(store.has_dir(stored_path.trim_end_matches('/')));
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let (_, routes) = setup();
    let response = warp::test::request()
        .method("POST")
        .path("/store/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(multipart_body(Some("docs"), None))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json(response.body());
    assert_eq!(body["resCode"], "0001");
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn test_download_non_ascii_name() {
    let (store, routes) = setup();
    store.dirs.lock().unwrap().insert("/docs".to_string());
    store
        .files
        .lock()
        .unwrap()
        .insert("/docs/报告.pdf".to_string(), Bytes::from_static(b"%PDF"));

    let response = warp::test::request()
        .path("/store/download?path=%2Fdocs%2F%E6%8A%A5%E5%91%8A.pdf")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()["content-disposition"].as_bytes();
    assert!(disposition.starts_with(b"attachment; filename=\""));
    assert!(disposition.ends_with(b"filename*=UTF-8''%E6%8A%A5%E5%91%8A.pdf"));
    assert_eq!(response.body().as_ref(), b"%PDF");
}

#[tokio::test]
async fn test_download_missing_file_returns_envelope() {
    let (_, routes) = setup();
    let response = warp::test::request()
        .path("/store/download?path=/missing.pdf")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json(response.body()),
        serde_json::json!({ "resCode": "0001", "data": null, "msg": "404 Not Found" })
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (_, routes) = setup();
    let response = warp::test::request()
        .path("/store/device111")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(response.body())["resCode"], "0001");
}

#[tokio::test]
async fn test_mkdir_with_invalid_body() {
    let (_, routes) = setup();
    let response = warp::test::request()
        .method("POST")
        .path("/store/mkdir")
        .header("content-type", "application/json")
        .body("{not json")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response.body())["resCode"], "0001");
}

#[tokio::test]
async fn test_mkdir_body_over_limit_is_413() {
    let (store, routes) = setup();
    let long_path = format!("/{}", "a".repeat(20 * 1024));
    let response = warp::test::request()
        .method("POST")
        .path("/store/mkdir")
        .json(&serde_json::json!({ "path": long_path }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json(response.body())["resCode"], "0001");
    assert!(!store.has_dir(&long_path));
}

#[tokio::test]
async fn test_upload_reads_parts_in_any_order() {
    let (store, routes) = setup();
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"data.csv\"\r\nContent-Type: text/csv\r\n\r\na,b\n1,2\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"comment\"\r\n\r\nignored\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"path\"\r\n\r\n/reports\r\n\
         --{b}--\r\n",
        b = BOUNDARY
    );
    let response = warp::test::request()
        .method("POST")
        .path("/store/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(body)
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response.body());
    assert_eq!(body["resCode"], "0000", "{}", body);

    let record = &body["data"];
    let stored_path = record["storedPath"].as_str().unwrap();
    let stored_file_name = record["storedFileName"].as_str().unwrap();
    assert!(stored_path.starts_with("/reports/"));
    assert!(stored_file_name.ends_with(".csv"));
    assert_eq!(record["originalFileName"], "data.csv");
    assert_eq!(
        store.file(&format!("{}{}", stored_path, stored_file_name)),
        Some(Bytes::from_static(b"a,b\n1,2"))
    );
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let (_, routes) = setup();
    let response = warp::test::request()
        .method("GET")
        .path("/store/delete?path=/a")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
