use crate::errors::TransportFailure;
use crate::store::{RemoteEntry, RemoteStore};
use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest_dav::{Auth, ClientBuilder, DecodeError, Depth, Error as DavError};

pub struct WebDAVClient {
    client: reqwest_dav::Client,
}

impl WebDAVClient {
    pub fn new(webdav_url: String, username: String, password: String) -> Result<Self> {
        let client = ClientBuilder::new()
            .set_host(webdav_url)
            .set_auth(Auth::Basic(username, password))
            .build()?;
        Ok(Self { client })
    }

    pub fn host(&self) -> &str {
        &self.client.host
    }

    /// 检查是否连接到 WebDAV 服务器
    pub async fn is_connected(&self) -> bool {
        self.client.list("/", Depth::Number(0)).await.is_ok()
    }
}

/// Status code of a PROPFIND/DELETE/etc. answer the server rejected.
fn response_code(err: &DavError) -> Option<u16> {
    match err {
        DavError::Decode(DecodeError::StatusMismatched(e)) => Some(e.response_code),
        DavError::Decode(DecodeError::Server(e)) => Some(e.response_code),
        _ => None,
    }
}

#[async_trait]
impl RemoteStore for WebDAVClient {
    async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let entries = self.client.list(path, Depth::Number(1)).await?;
        Ok(entries
            .iter()
            .map(|entity| RemoteEntry::from_list_entity(entity, &self.client.host))
            .collect())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        match self.client.list(path, Depth::Number(0)).await {
            Ok(_) => Ok(true),
            Err(e) if response_code(&e) == Some(404) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        self.client.mkcol(path).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.client.delete(path).await?;
        Ok(())
    }

    async fn put(&self, path: &str, content: Bytes) -> Result<()> {
        self.client.put(path, content).await?;
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Bytes> {
        let response = self.client.get(path).await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.bytes().await?)
        } else {
            Err(TransportFailure(status.to_string()).into())
        }
    }
}
