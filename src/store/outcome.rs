use serde::Serialize;

const FALLBACK_MESSAGE: &str = "远程存储请求失败";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResCode {
    #[serde(rename = "0000")]
    Success,
    #[serde(rename = "0001")]
    Failure,
}

/// Result of one facade operation.
///
/// A failed outcome always carries a message and the empty form of its data.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome<T> {
    pub status: ResCode,
    pub data: T,
    pub message: String,
}

impl<T> OperationOutcome<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ResCode::Success,
            data,
            message: String::new(),
        }
    }

    pub fn failure(data: T, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = FALLBACK_MESSAGE.to_string();
        }
        Self {
            status: ResCode::Failure,
            data,
            message,
        }
    }

    /// Converts a client result, using `empty` as the payload on failure.
    pub fn from_result(result: anyhow::Result<T>, empty: T) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(empty, format!("{:#}", e)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResCode::Success
    }
}

impl<T> OperationOutcome<Option<T>> {
    pub fn from_optional(result: anyhow::Result<T>) -> Self {
        Self::from_result(result.map(Some), None)
    }
}
