use std::fmt;

/// Any failure reported by the remote WebDAV server or the transport below it.
#[derive(Debug)]
pub struct TransportFailure(pub String);

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "远程存储请求失败: {}", self.0)
    }
}

impl std::error::Error for TransportFailure {}

/// Multipart upload that could not be turned into a file.
#[derive(Debug)]
pub struct UploadError(pub String);

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "上传请求无效: {}", self.0)
    }
}

impl warp::reject::Reject for UploadError {}
