//! Typed handlers, one per resource family
//!
//! Each handler wraps a [`Client`](crate::Client) and exposes one async
//! method per API operation. Methods check their identifying inputs before
//! anything is sent, build a [`Request`](crate::Request), execute it and
//! decode the result. Errors are passed through untouched.

pub mod account;
pub mod insights;
pub mod ocean;

use crate::error::ValidationError;

/// Reject a missing or empty identifying field
pub(crate) fn required<'a>(
    field: &str,
    value: Option<&'a str>,
) -> std::result::Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::required(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required("clusterId", Some("o-1")), Ok("o-1"));
        assert_eq!(
            required("clusterId", Some("")),
            Err(ValidationError::required("clusterId"))
        );
        assert_eq!(
            required("clusterId", None),
            Err(ValidationError::required("clusterId"))
        );
    }
}
