use super::{with_facade, PathQuery};
use crate::store::RemoteStoreFacade;
use crate::web::response::ApiResponse;
use serde::Deserialize;
use std::sync::Arc;
use warp::Filter;

/// Largest accepted mkdir body. Enforced through `Content-Length`, so chunked
/// requests without that header are answered with 411.
const MKDIR_BODY_LIMIT: u64 = 16 * 1024;

#[derive(Deserialize, Debug, Default)]
pub struct PathBody {
    pub path: Option<String>,
}

pub fn list(
    facade: Arc<RemoteStoreFacade>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("list")
        .and(warp::get())
        .and(warp::query::<PathQuery>())
        .and(with_facade(facade))
        .then(|query: PathQuery, facade: Arc<RemoteStoreFacade>| async move {
            ApiResponse::from(facade.list(query.path.as_deref()).await).into_response()
        })
}

pub fn exists(
    facade: Arc<RemoteStoreFacade>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("exists")
        .and(warp::get())
        .and(warp::query::<PathQuery>())
        .and(with_facade(facade))
        .then(|query: PathQuery, facade: Arc<RemoteStoreFacade>| async move {
            ApiResponse::from(facade.exists(query.path.as_deref()).await).into_response()
        })
}

pub fn mkdir(
    facade: Arc<RemoteStoreFacade>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("mkdir")
        .and(warp::post())
        .and(warp::body::content_length_limit(MKDIR_BODY_LIMIT))
        .and(warp::body::json::<PathBody>())
        .and(with_facade(facade))
        .then(|body: PathBody, facade: Arc<RemoteStoreFacade>| async move {
            ApiResponse::from(facade.mkdir(body.path.as_deref()).await).into_response()
        })
}

pub fn delete(
    facade: Arc<RemoteStoreFacade>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("delete")
        .and(warp::delete())
        .and(warp::query::<PathQuery>())
        .and(with_facade(facade))
        .then(|query: PathQuery, facade: Arc<RemoteStoreFacade>| async move {
            ApiResponse::from(facade.delete(query.path.as_deref()).await).into_response()
        })
}
