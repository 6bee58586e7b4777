mod aws_sdk;

use crate::error::ProviderError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub(crate) use aws_sdk::connect;

pub type AwsResult<T> = Result<T, ProviderError>;

/// Trait representing interactions with CloudFormation
#[async_trait::async_trait]
pub trait AwsCloudFormationClient: Send + Sync {
    async fn create_stack(&self, input: CreateStackInput) -> AwsResult<CreateStackOutput>;

    async fn update_stack(&self, input: UpdateStackInput) -> AwsResult<UpdateStackOutput>;

    async fn describe_stacks(&self, input: DescribeStacksInput)
        -> AwsResult<DescribeStacksOutput>;

    async fn describe_stack_resource(
        &self,
        input: DescribeStackResourceInput,
    ) -> AwsResult<DescribeStackResourceOutput>;

    async fn describe_stack_resources(
        &self,
        input: DescribeStackResourcesInput,
    ) -> AwsResult<DescribeStackResourcesOutput>;
}

/// Body shared by create and update requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTemplateInput {
    pub stack_name: String,
    pub template_body: String,
    pub parameters: Option<BTreeMap<String, String>>,
    pub capabilities: Vec<String>,
}

pub type CreateStackInput = StackTemplateInput;
pub type UpdateStackInput = StackTemplateInput;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateStackOutput {
    pub stack_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateStackOutput {
    pub stack_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeStacksInput {
    pub stack_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeStacksOutput {
    pub stacks: Vec<Stack>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeStackResourceInput {
    pub stack_name: String,
    pub logical_resource_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeStackResourceOutput {
    pub stack_resource_detail: Option<StackResourceDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeStackResourcesInput {
    pub stack_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeStackResourcesOutput {
    pub stack_resources: Vec<StackResource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack {
    pub stack_id: Option<String>,
    pub stack_name: String,
    pub description: Option<String>,
    pub stack_status: Option<String>,
    pub stack_status_reason: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_updated_time: Option<DateTime<Utc>>,
    pub parameters: BTreeMap<String, String>,
    pub outputs: Vec<Output>,
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackResource {
    pub stack_name: Option<String>,
    pub stack_id: Option<String>,
    pub logical_resource_id: String,
    pub physical_resource_id: Option<String>,
    pub resource_type: String,
    pub resource_status: Option<String>,
    pub resource_status_reason: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackResourceDetail {
    pub stack_name: Option<String>,
    pub stack_id: Option<String>,
    pub logical_resource_id: String,
    pub physical_resource_id: Option<String>,
    pub resource_type: String,
    pub resource_status: Option<String>,
    pub resource_status_reason: Option<String>,
    pub last_updated_timestamp: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub metadata: Option<String>,
}
