pub mod store;
pub mod transfer;

use crate::store::RemoteStoreFacade;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

#[derive(Deserialize, Debug, Default)]
pub struct PathQuery {
    pub path: Option<String>,
}

fn with_facade(
    facade: Arc<RemoteStoreFacade>,
) -> impl Filter<Extract = (Arc<RemoteStoreFacade>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&facade))
}

/// Every `/store/*` endpoint.
pub fn store_routes(
    facade: Arc<RemoteStoreFacade>,
    max_upload_size: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("store").and(
        store::list(facade.clone())
            .or(store::exists(facade.clone()))
            .or(store::mkdir(facade.clone()))
            .or(store::delete(facade.clone()))
            .or(transfer::upload(facade.clone(), max_upload_size))
            .or(transfer::download(facade)),
    )
}
