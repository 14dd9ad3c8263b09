//! Redis error conversion.

use iam_kv::KvError;

/// Converts a `fred` Redis error to a `KvError`.
#[allow(clippy::needless_pass_by_value)]
pub fn from_redis_error(err: fred::error::Error) -> KvError {
    if err.details().starts_with("WRONGTYPE") {
        return KvError::WrongType(err.details().to_string());
    }
    match err.kind() {
        fred::error::ErrorKind::Timeout => KvError::Timeout,
        fred::error::ErrorKind::IO | fred::error::ErrorKind::Canceled => {
            KvError::Connection(err.to_string())
        }
        fred::error::ErrorKind::Config | fred::error::ErrorKind::Url => {
            KvError::Configuration(err.to_string())
        }
        _ => KvError::Internal(err.to_string()),
    }
}
