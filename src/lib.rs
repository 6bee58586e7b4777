//! Thin client over the CloudFormation stack API.
//!
//! [`StackClient`] validates identifiers, forwards requests through an
//! [`AwsCloudFormationClient`](aws::AwsCloudFormationClient) and unwraps the
//! part of each response callers care about.

pub mod aws;
mod client;
mod config;
mod error;
pub mod stack_status;

pub use crate::client::{
    is_no_updates_error, ParameterSet, StackClient, UpdateOutcome, CAPABILITY_IAM,
    NO_UPDATES_MESSAGE,
};
pub use crate::config::ClientConfig;
pub use crate::error::{Error, ProviderError, Result, ValidationError};
