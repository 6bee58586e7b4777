use aws_sdk_cloudformation::error::{ProvideErrorMetadata, SdkError};
use aws_smithy_types::error::display::DisplayErrorContext;
use std::fmt::Debug;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid awsProfile or Invalid awsRegion")]
    InvalidConfig,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("provider response is missing {0}")]
    MissingField(&'static str),
}

/// A required identifier was empty, so no request was sent.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Stack ID must be set to further describe")]
    DescribeStackName,
    #[error("Stack ID must be set to describe its resources")]
    ResourceStackName,
    #[error("Logical ID must be set to describe its resources")]
    LogicalId,
}

/// Failure reported by, or on the way to, the CloudFormation API.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{code}: {message}")]
    Service { code: String, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("dispatch failure: {0}")]
    Dispatch(String),
    #[error("error reading response: {0}")]
    Response(String),
    #[error("could not construct request: {0}")]
    Construction(String),
    #[error("other error {0}")]
    Other(String),
}

impl ProviderError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Service { message, .. } => Some(message),
            _ => None,
        }
    }

    pub(crate) fn from_sdk<E, R>(e: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: Debug,
    {
        match e {
            SdkError::ServiceError(ref context) => {
                let err = context.err();
                Self::Service {
                    code: err.code().unwrap_or("Unknown").to_string(),
                    message: err
                        .message()
                        .map(str::to_string)
                        .unwrap_or_else(|| err.to_string()),
                }
            }
            SdkError::TimeoutError(_) => Self::Timeout,
            SdkError::DispatchFailure(_) => Self::Dispatch(DisplayErrorContext(&e).to_string()),
            SdkError::ResponseError(_) => Self::Response(DisplayErrorContext(&e).to_string()),
            SdkError::ConstructionFailure(_) => {
                Self::Construction(DisplayErrorContext(&e).to_string())
            }
            _ => Self::Other(DisplayErrorContext(&e).to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_cloudformation::error::ErrorMetadata;
    use aws_sdk_cloudformation::operation::describe_stacks::DescribeStacksError;

    #[test]
    fn messages_match_callers_expectations() {
        assert_eq!(
            Error::InvalidConfig.to_string(),
            "Invalid awsProfile or Invalid awsRegion"
        );
        assert_eq!(
            Error::from(ValidationError::DescribeStackName).to_string(),
            "Stack ID must be set to further describe"
        );
        assert_eq!(
            Error::from(ValidationError::ResourceStackName).to_string(),
            "Stack ID must be set to describe its resources"
        );
        assert_eq!(
            Error::from(ValidationError::LogicalId).to_string(),
            "Logical ID must be set to describe its resources"
        );
    }

    #[test]
    fn service_errors_keep_code_and_message() {
        let meta = ErrorMetadata::builder()
            .code("ValidationError")
            .message("Stack with id missing does not exist")
            .build();
        let e: SdkError<DescribeStacksError, ()> =
            SdkError::service_error(DescribeStacksError::generic(meta), ());

        let err = ProviderError::from_sdk(e);
        assert_eq!(err.code(), Some("ValidationError"));
        assert_eq!(err.message(), Some("Stack with id missing does not exist"));
    }

    #[test]
    fn timeouts_have_no_code() {
        let e: SdkError<DescribeStacksError, ()> = SdkError::timeout_error("took too long");

        let err = ProviderError::from_sdk(e);
        assert_eq!(err, ProviderError::Timeout);
        assert_eq!(err.code(), None);
    }
}
