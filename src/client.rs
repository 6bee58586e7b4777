use crate::aws::{
    AwsCloudFormationClient, DescribeStackResourceInput, DescribeStackResourcesInput,
    DescribeStacksInput, Stack, StackResource, StackResourceDetail, StackTemplateInput,
    UpdateStackOutput,
};
use crate::config::ClientConfig;
use crate::error::{Error, ProviderError, Result, ValidationError};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Capability acknowledged on every create and update request.
pub const CAPABILITY_IAM: &str = "CAPABILITY_IAM";

/// Message CloudFormation returns when an update would change nothing.
pub const NO_UPDATES_MESSAGE: &str = "No updates are to be performed.";

const NO_UPDATES_CODE: &str = "ValidationError";

pub type ParameterSet = BTreeMap<String, String>;

/// Result of a successful [`StackClient::update_stack`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The provider accepted the update; its response is returned as is.
    Updated(UpdateStackOutput),
    /// The template and parameters match the deployed stack.
    Unchanged(String),
}

/// Whether an update failure only means there was nothing to change.
pub fn is_no_updates_error(err: &ProviderError) -> bool {
    err.code() == Some(NO_UPDATES_CODE) && err.message() == Some(NO_UPDATES_MESSAGE)
}

/// Client for creating, updating and describing CloudFormation stacks.
///
/// The region and credentials are fixed at construction. The client holds no
/// mutable state, so one instance can serve concurrent calls.
pub struct StackClient<C = aws_sdk_cloudformation::Client> {
    region: String,
    provider: C,
}

impl<C> Debug for StackClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackClient")
            .field("region", &self.region)
            .finish()
    }
}

impl StackClient<aws_sdk_cloudformation::Client> {
    /// Build a client for the configured profile and region.
    ///
    /// Fails with [`Error::InvalidConfig`] if either is missing or empty.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let resolved = config.resolve()?;
        let provider = crate::aws::connect(&resolved);
        Ok(Self {
            region: resolved.region,
            provider,
        })
    }
}

impl<C> StackClient<C>
where
    C: AwsCloudFormationClient,
{
    /// Like [`StackClient::new`], but sends requests through `provider`.
    pub fn with_provider(config: ClientConfig, provider: C) -> Result<Self> {
        let resolved = config.resolve()?;
        Ok(Self {
            region: resolved.region,
            provider,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Create a stack, returning the id of the new stack.
    pub async fn create_stack(
        &self,
        stack_name: &str,
        template_body: &str,
        parameters: &ParameterSet,
    ) -> Result<String> {
        let input = template_request(stack_name, template_body, parameters);
        let output = self.provider.create_stack(input).await?;
        output.stack_id.ok_or(Error::MissingField("StackId"))
    }

    pub async fn update_stack(
        &self,
        stack_name: &str,
        template_body: &str,
        parameters: &ParameterSet,
    ) -> Result<UpdateOutcome> {
        let input = template_request(stack_name, template_body, parameters);
        match self.provider.update_stack(input).await {
            Ok(output) => Ok(UpdateOutcome::Updated(output)),
            Err(e) if is_no_updates_error(&e) => {
                tracing::debug!(%stack_name, "stack is already up to date");
                let message = e.message().unwrap_or(NO_UPDATES_MESSAGE).to_string();
                Ok(UpdateOutcome::Unchanged(message))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn describe_stack(&self, stack_name: &str) -> Result<Stack> {
        if stack_name.is_empty() {
            tracing::debug!("no stack name given, not describing");
            return Err(ValidationError::DescribeStackName.into());
        }

        let input = DescribeStacksInput {
            stack_name: stack_name.to_string(),
        };
        let output = self.provider.describe_stacks(input).await?;
        output
            .stacks
            .into_iter()
            .next()
            .ok_or(Error::MissingField("Stacks"))
    }

    pub async fn describe_stack_resource(
        &self,
        stack_name: &str,
        logical_id: &str,
    ) -> Result<StackResourceDetail> {
        if stack_name.is_empty() {
            tracing::debug!("no stack name given, not describing resource");
            return Err(ValidationError::ResourceStackName.into());
        }
        if logical_id.is_empty() {
            tracing::debug!(%stack_name, "no logical id given, not describing resource");
            return Err(ValidationError::LogicalId.into());
        }

        let input = DescribeStackResourceInput {
            stack_name: stack_name.to_string(),
            logical_resource_id: logical_id.to_string(),
        };
        let output = self.provider.describe_stack_resource(input).await?;
        output
            .stack_resource_detail
            .ok_or(Error::MissingField("StackResourceDetail"))
    }

    pub async fn describe_stack_resources(&self, stack_name: &str) -> Result<Vec<StackResource>> {
        if stack_name.is_empty() {
            tracing::debug!("no stack name given, not describing resources");
            return Err(ValidationError::ResourceStackName.into());
        }

        let input = DescribeStackResourcesInput {
            stack_name: stack_name.to_string(),
        };
        let output = self.provider.describe_stack_resources(input).await?;
        Ok(output.stack_resources)
    }
}

// Empty parameter sets are left off the request entirely.
fn template_request(
    stack_name: &str,
    template_body: &str,
    parameters: &ParameterSet,
) -> StackTemplateInput {
    StackTemplateInput {
        stack_name: stack_name.to_string(),
        template_body: template_body.to_string(),
        parameters: if parameters.is_empty() {
            None
        } else {
            Some(parameters.clone())
        },
        capabilities: vec![CAPABILITY_IAM.to_string()],
    }
}
