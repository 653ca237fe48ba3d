//! Operation status and result types.
//!
//! Callers that talk to the controller report outcomes through these types;
//! the codec itself only produces them from
//! [`FlowError`](crate::error::FlowError).

use std::fmt;

use crate::error::FlowResult;

/// Outcome of a controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperStatus {
    /// Operation completed successfully
    Ok,
    /// Controller could not be reached
    ConnectionError,
    /// Requested data does not exist
    DataNotFound,
    /// Response or input could not be parsed
    MalformedData,
    /// Controller answered with a non-success HTTP status
    HttpError { code: u16 },
}

impl OperStatus {
    /// Maps an HTTP status code to an OperStatus.
    pub fn from_http(code: u16) -> Self {
        match code {
            200..=299 => OperStatus::Ok,
            404 => OperStatus::DataNotFound,
            _ => OperStatus::HttpError { code },
        }
    }

    /// Returns true if the operation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, OperStatus::Ok)
    }

    /// Returns true if retrying the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            OperStatus::ConnectionError => true,
            OperStatus::HttpError { code } => *code >= 500,
            _ => false,
        }
    }

    /// Returns true if the operation failed permanently.
    pub fn is_failure(&self) -> bool {
        !self.is_ok() && !self.is_retryable()
    }
}

impl fmt::Display for OperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperStatus::Ok => f.write_str("ok"),
            OperStatus::ConnectionError => f.write_str("connection error"),
            OperStatus::DataNotFound => f.write_str("data not found"),
            OperStatus::MalformedData => f.write_str("malformed data"),
            OperStatus::HttpError { code } => write!(f, "http error {}", code),
        }
    }
}

/// A status paired with the payload of a successful operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperResult<T> {
    pub status: OperStatus,
    pub data: Option<T>,
}

impl<T> OperResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: OperStatus::Ok,
            data: Some(data),
        }
    }

    pub fn failed(status: OperStatus) -> Self {
        Self { status, data: None }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

impl<T> From<FlowResult<T>> for OperResult<T> {
    fn from(result: FlowResult<T>) -> Self {
        match result {
            Ok(data) => OperResult::ok(data),
            Err(e) => OperResult::failed(e.to_status()),
        }
    }
}

/// Extension trait for converting FlowResult to OperStatus.
pub trait StatusExt {
    /// Converts this result to an OperStatus.
    fn to_status(&self) -> OperStatus;
}

impl<T> StatusExt for FlowResult<T> {
    fn to_status(&self) -> OperStatus {
        match self {
            Ok(_) => OperStatus::Ok,
            Err(e) => e.to_status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_classification() {
        assert!(OperStatus::Ok.is_ok());
        assert!(!OperStatus::Ok.is_failure());

        assert!(OperStatus::ConnectionError.is_retryable());
        assert!(OperStatus::HttpError { code: 503 }.is_retryable());
        assert!(!OperStatus::HttpError { code: 400 }.is_retryable());

        assert!(OperStatus::DataNotFound.is_failure());
        assert!(OperStatus::MalformedData.is_failure());
        assert!(OperStatus::HttpError { code: 409 }.is_failure());
    }

    #[test]
    fn test_from_http() {
        assert_eq!(OperStatus::from_http(200), OperStatus::Ok);
        assert_eq!(OperStatus::from_http(204), OperStatus::Ok);
        assert_eq!(OperStatus::from_http(404), OperStatus::DataNotFound);
        assert_eq!(
            OperStatus::from_http(500),
            OperStatus::HttpError { code: 500 }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(OperStatus::Ok.to_string(), "ok");
        assert_eq!(
            OperStatus::HttpError { code: 409 }.to_string(),
            "http error 409"
        );
    }

    #[test]
    fn test_result_conversion() {
        let ok: FlowResult<u32> = Ok(3);
        assert_eq!(ok.to_status(), OperStatus::Ok);
        assert_eq!(OperResult::from(ok).data, Some(3));

        let err: FlowResult<u32> = Err(FlowError::data_not_found("flow 1"));
        assert_eq!(err.to_status(), OperStatus::DataNotFound);

        let result = OperResult::from(err);
        assert!(!result.is_ok());
        assert_eq!(result.status, OperStatus::DataNotFound);
        assert_eq!(result.data, None);
    }
}
