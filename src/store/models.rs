use bytes::Bytes;
use chrono::{DateTime, Local, Utc};
use percent_encoding::percent_decode_str;
use reqwest_dav::list_cmd::ListEntity;
use serde::{Serialize, Serializer};

/// One file or directory returned by a remote listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    pub href: String,
    pub is_directory: bool,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

impl RemoteEntry {
    pub fn from_list_entity(entity: &ListEntity, host: &str) -> Self {
        let (href, is_directory, size, last_modified, content_type, etag) = match entity {
            ListEntity::File(file) => (
                &file.href,
                false,
                file.content_length.max(0) as u64,
                file.last_modified,
                Some(file.content_type.clone()),
                file.tag.clone(),
            ),
            ListEntity::Folder(folder) => (
                &folder.href,
                true,
                0,
                folder.last_modified,
                None,
                folder.tag.clone(),
            ),
        };

        // `path` is decoded, `href` keeps the server encoding
        let path = percent_decode_str(&Self::strip_prefix(href, host))
            .decode_utf8_lossy()
            .into_owned();
        let name = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
            .to_string();

        Self {
            name,
            path,
            href: href.clone(),
            is_directory,
            size,
            last_modified,
            content_type,
            etag,
        }
    }

    /// Path portion of the host url, e.g. `/dav` for `https://example.com/dav/`.
    pub fn get_prefix(url: &str) -> Option<String> {
        let prefix = url
            .split('/')
            .skip(3) // 跳过 "https:" 和两个空字符串
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        if prefix.is_empty() {
            None
        } else {
            Some(format!("/{}", prefix))
        }
    }

    fn strip_prefix(href: &str, host: &str) -> String {
        let path = match Self::get_prefix(host) {
            Some(prefix) => href.strip_prefix(prefix.as_str()).unwrap_or(href),
            None => href,
        };
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        }
    }
}

fn serialize_local_time<S: Serializer>(time: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&time.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// What was written to the remote store by one upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileRecord {
    #[serde(serialize_with = "serialize_local_time")]
    pub create_time: DateTime<Local>,
    #[serde(serialize_with = "serialize_local_time")]
    pub update_time: DateTime<Local>,
    pub stored_file_name: String,
    pub stored_path: String,
    pub original_file_name: String,
}

impl UploadedFileRecord {
    pub fn new(
        now: DateTime<Local>,
        stored_file_name: String,
        stored_path: String,
        original_file_name: String,
    ) -> Self {
        Self {
            create_time: now,
            update_time: now,
            stored_file_name,
            stored_path,
            original_file_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub file_name: String,
    pub content: Bytes,
}
