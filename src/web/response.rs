use crate::store::{OperationOutcome, ResCode};
use serde::Serialize;
use warp::http::StatusCode;
use warp::Reply;

/// `{"resCode": "0000"|"0001", "data": ..., "msg": "..."}`
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(rename = "resCode")]
    pub res_code: ResCode,
    pub data: T,
    pub msg: String,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(res_code: ResCode, data: T, msg: String) -> Self {
        Self {
            res_code,
            data,
            msg,
            status: StatusCode::OK,
        }
    }

    pub fn success(data: T) -> Self {
        Self::new(ResCode::Success, data, String::new())
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn into_response(self) -> warp::reply::Response {
        warp::reply::with_status(warp::reply::json(&self), self.status).into_response()
    }
}

impl ApiResponse<()> {
    pub fn error(status: StatusCode, msg: String) -> Self {
        Self::new(ResCode::Failure, (), msg).with_status(status)
    }
}

impl<T: Serialize> From<OperationOutcome<T>> for ApiResponse<T> {
    fn from(outcome: OperationOutcome<T>) -> Self {
        Self::new(outcome.status, outcome.data, outcome.message)
    }
}
