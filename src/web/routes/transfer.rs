use super::{with_facade, PathQuery};
use crate::errors::UploadError;
use crate::store::{DownloadedFile, RemoteStoreFacade};
use crate::web::response::ApiResponse;
use bytes::{BufMut, Bytes};
use encoding_rs::GBK;
use futures::TryStreamExt;
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;
use warp::http::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use warp::multipart::{FormData, Part};
use warp::Filter;

/// RFC 5987 attr-char minus the characters that are always safe.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn upload(
    facade: Arc<RemoteStoreFacade>,
    max_upload_size: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("upload")
        .and(warp::post())
        .and(warp::multipart::form().max_length(max_upload_size))
        .and(with_facade(facade))
        .and_then(handle_upload)
}

pub fn download(
    facade: Arc<RemoteStoreFacade>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("download")
        .and(warp::get())
        .and(warp::query::<PathQuery>())
        .and(with_facade(facade))
        .then(|query: PathQuery, facade: Arc<RemoteStoreFacade>| async move {
            let outcome = facade.download(query.path.as_deref()).await;
            match outcome.data {
                Some(file) => file_response(file),
                None => ApiResponse::new(outcome.status, (), outcome.message).into_response(),
            }
        })
}

struct UploadForm {
    path: Option<String>,
    file_name: String,
    content: Bytes,
}

async fn handle_upload(
    form: FormData,
    facade: Arc<RemoteStoreFacade>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let form = read_form(form).await.map_err(warp::reject::custom)?;
    debug!(
        "Upload of {} ({} bytes) into {:?}",
        form.file_name,
        form.content.len(),
        form.path
    );
    let outcome = facade
        .upload(form.path.as_deref(), form.content, &form.file_name)
        .await;
    Ok(ApiResponse::from(outcome).into_response())
}

/// Each part must be fully read before the next one is requested.
async fn read_form(mut form: FormData) -> Result<UploadForm, UploadError> {
    let mut path = None;
    let mut file = None;
    while let Some(part) = form
        .try_next()
        .await
        .map_err(|e| UploadError(e.to_string()))?
    {
        let name = part.name().to_string();
        match name.as_str() {
            "path" => {
                let value = read_part(part).await?;
                path = Some(
                    String::from_utf8(value.to_vec())
                        .map_err(|_| UploadError("path 字段不是有效的 UTF-8".to_string()))?,
                );
            }
            "file" => {
                let file_name = part.filename().unwrap_or_default().to_string();
                file = Some((file_name, read_part(part).await?));
            }
            _ => {}
        }
    }

    let (file_name, content) = file.ok_or_else(|| UploadError("缺少 file 字段".to_string()))?;
    Ok(UploadForm {
        path,
        file_name,
        content,
    })
}

async fn read_part(part: Part) -> Result<Bytes, UploadError> {
    let content = part
        .stream()
        .try_fold(Vec::new(), |mut acc, buf| async move {
            acc.put(buf);
            Ok(acc)
        })
        .await
        .map_err(|e| UploadError(e.to_string()))?;
    Ok(Bytes::from(content))
}

fn file_response(file: DownloadedFile) -> warp::reply::Response {
    let disposition = content_disposition(&file.file_name);
    let mut response = warp::reply::Response::new(file.content.into());
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(CONTENT_DISPOSITION, disposition);
    response
}

/// `attachment` header keeping non-ASCII names readable.
///
/// `filename` carries the name as raw GBK bytes for older browsers that read
/// the header as ISO-8859-1; `filename*` carries the UTF-8 form.
pub fn content_disposition(file_name: &str) -> HeaderValue {
    let (legacy, _, _) = GBK.encode(file_name);
    let mut value = b"attachment; filename=\"".to_vec();
    value.extend(
        legacy
            .iter()
            .filter(|&&b| b >= 0x20 && b != 0x7f && b != b'"'),
    );
    value.extend_from_slice(b"\"; filename*=UTF-8''");
    value.extend_from_slice(
        utf8_percent_encode(file_name, FILENAME_ENCODE_SET)
            .to_string()
            .as_bytes(),
    );
    HeaderValue::from_bytes(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
