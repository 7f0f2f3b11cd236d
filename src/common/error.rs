//! Error types for minidfs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The closed error set every RPC surface speaks.
///
/// Transport-level failures (connect errors, lapsed deadlines) fold into
/// `Unavailable`; local I/O failures fold into `Internal`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convert to a gRPC status for RPC responses
    pub fn to_status(&self) -> tonic::Status {
        use tonic::Code;
        match self {
            Error::InvalidArgument(_) => tonic::Status::new(Code::InvalidArgument, self.to_string()),
            Error::NotFound(_) => tonic::Status::new(Code::NotFound, self.to_string()),
            Error::Unavailable(_) => tonic::Status::new(Code::Unavailable, self.to_string()),
            Error::Internal(_) => tonic::Status::new(Code::Internal, self.to_string()),
        }
    }
}

impl From<Error> for tonic::Status {
    fn from(e: Error) -> Self {
        e.to_status()
    }
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        use tonic::Code;
        let message = status.message().to_string();
        match status.code() {
            Code::InvalidArgument => Error::InvalidArgument(message),
            Code::NotFound => Error::NotFound(message),
            Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled => {
                Error::Unavailable(message)
            }
            _ => Error::Internal(message),
        }
    }
}

impl From<tonic::transport::Error> for Error {
    fn from(e: tonic::transport::Error) -> Self {
        Error::Unavailable(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Internal(format!("I/O error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_status_round_trip() {
        let cases = [
            (Error::InvalidArgument("bad".into()), Code::InvalidArgument),
            (Error::NotFound("f.txt".into()), Code::NotFound),
            (Error::Unavailable("peer".into()), Code::Unavailable),
            (Error::Internal("oops".into()), Code::Internal),
        ];

        for (err, code) in cases {
            let status = err.to_status();
            assert_eq!(status.code(), code);

            let back = Error::from(status);
            assert_eq!(back.to_status().code(), code);
        }
    }

    #[test]
    fn test_deadline_maps_to_unavailable() {
        let status = tonic::Status::new(Code::DeadlineExceeded, "timed out");
        assert!(matches!(Error::from(status), Error::Unavailable(_)));
    }

    #[test]
    fn test_io_maps_to_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(Error::from(io), Error::Internal(_)));
    }
}
