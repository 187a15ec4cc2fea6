mod response;
pub mod routes;
pub mod server;

use log::warn;
pub use response::ApiResponse;
pub use server::WebServer;

use crate::errors::UploadError;
use crate::store::RemoteStoreFacade;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection};

/// All routes with rejections rendered as the JSON envelope.
pub fn api(
    facade: Arc<RemoteStoreFacade>,
    max_upload_size: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
    routes::store_routes(facade, max_upload_size).recover(handle_rejection)
}

pub async fn handle_rejection(
    err: Rejection,
) -> Result<warp::reply::Response, std::convert::Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "未找到资源".to_string())
    } else if let Some(upload_error) = err.find::<UploadError>() {
        (StatusCode::BAD_REQUEST, upload_error.to_string())
    } else if let Some(body_error) = err.find::<warp::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, body_error.to_string())
    } else if let Some(query_error) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, query_error.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "请求体过大".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "缺少 Content-Length".to_string())
    } else if let Some(media_error) = err.find::<warp::reject::UnsupportedMediaType>() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, media_error.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "请求方法不被允许".to_string())
    } else {
        warn!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "内部服务器错误".to_string(),
        )
    };

    Ok(ApiResponse::error(code, message).into_response())
}
