use super::{
    AwsCloudFormationClient, AwsResult, CreateStackInput, CreateStackOutput,
    DescribeStackResourceInput, DescribeStackResourceOutput, DescribeStackResourcesInput,
    DescribeStackResourcesOutput, DescribeStacksInput, DescribeStacksOutput, Output, Stack,
    StackResource, StackResourceDetail, UpdateStackInput, UpdateStackOutput,
};
use crate::config::ResolvedConfig;
use crate::error::ProviderError;

use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation::types::{Capability, Parameter};
use aws_sdk_cloudformation::Client;
use aws_smithy_types::retry::RetryConfig;
use aws_smithy_types_convert::date_time::DateTimeExt;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::Instrument;

macro_rules! send_request {
    ($name:literal, $stack_name:expr, $builder:expr) => {
        $builder
            .send()
            .instrument(tracing::debug_span!($name, stack_name = %$stack_name))
            .await
            .map(From::from)
            .map_err(ProviderError::from_sdk)
    };
}

/// Build an SDK client bound to one profile and region. Nothing here touches
/// process-wide state, so clients with different settings can coexist.
pub(crate) fn connect(config: &ResolvedConfig) -> Client {
    let sdk_config = sdk_config(config).build();
    tracing::debug!(profile = %config.profile, region = %config.region, "built cloudformation client");
    Client::from_conf(sdk_config)
}

fn sdk_config(config: &ResolvedConfig) -> aws_sdk_cloudformation::config::Builder {
    let credentials = ProfileFileCredentialsProvider::builder()
        .profile_name(config.profile.as_str())
        .build();

    aws_sdk_cloudformation::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled())
}

#[async_trait::async_trait]
impl AwsCloudFormationClient for Client {
    async fn create_stack(&self, input: CreateStackInput) -> AwsResult<CreateStackOutput> {
        let stack_name = input.stack_name.clone();
        let builder = Client::create_stack(self)
            .stack_name(input.stack_name)
            .template_body(input.template_body)
            .set_capabilities(Some(to_sdk_capabilities(&input.capabilities)))
            .set_parameters(input.parameters.map(to_sdk_parameters));
        send_request!("create_stack", stack_name, builder)
    }

    async fn update_stack(&self, input: UpdateStackInput) -> AwsResult<UpdateStackOutput> {
        let stack_name = input.stack_name.clone();
        let builder = Client::update_stack(self)
            .stack_name(input.stack_name)
            .template_body(input.template_body)
            .set_capabilities(Some(to_sdk_capabilities(&input.capabilities)))
            .set_parameters(input.parameters.map(to_sdk_parameters));
        send_request!("update_stack", stack_name, builder)
    }

    async fn describe_stacks(
        &self,
        input: DescribeStacksInput,
    ) -> AwsResult<DescribeStacksOutput> {
        let stack_name = input.stack_name.clone();
        let builder = Client::describe_stacks(self).stack_name(input.stack_name);
        send_request!("describe_stacks", stack_name, builder)
    }

    async fn describe_stack_resource(
        &self,
        input: DescribeStackResourceInput,
    ) -> AwsResult<DescribeStackResourceOutput> {
        let stack_name = input.stack_name.clone();
        let builder = Client::describe_stack_resource(self)
            .stack_name(input.stack_name)
            .logical_resource_id(input.logical_resource_id);
        send_request!("describe_stack_resource", stack_name, builder)
    }

    async fn describe_stack_resources(
        &self,
        input: DescribeStackResourcesInput,
    ) -> AwsResult<DescribeStackResourcesOutput> {
        let stack_name = input.stack_name.clone();
        let builder = Client::describe_stack_resources(self).stack_name(input.stack_name);
        send_request!("describe_stack_resources", stack_name, builder)
    }
}

fn to_sdk_parameters(parameters: BTreeMap<String, String>) -> Vec<Parameter> {
    parameters
        .into_iter()
        .map(|(key, value)| {
            Parameter::builder()
                .parameter_key(key)
                .parameter_value(value)
                .build()
        })
        .collect()
}

fn to_sdk_capabilities(capabilities: &[String]) -> Vec<Capability> {
    capabilities
        .iter()
        .map(|c| Capability::from(c.as_str()))
        .collect()
}

fn to_utc(dt: Option<&aws_smithy_types::DateTime>) -> Option<DateTime<Utc>> {
    dt.and_then(|dt| dt.to_chrono_utc().ok())
}

// conversions from third party types

impl From<aws_sdk_cloudformation::operation::create_stack::CreateStackOutput>
    for CreateStackOutput
{
    fn from(o: aws_sdk_cloudformation::operation::create_stack::CreateStackOutput) -> Self {
        Self {
            stack_id: o.stack_id,
        }
    }
}

impl From<aws_sdk_cloudformation::operation::update_stack::UpdateStackOutput>
    for UpdateStackOutput
{
    fn from(o: aws_sdk_cloudformation::operation::update_stack::UpdateStackOutput) -> Self {
        Self {
            stack_id: o.stack_id,
        }
    }
}

impl From<aws_sdk_cloudformation::operation::describe_stacks::DescribeStacksOutput>
    for DescribeStacksOutput
{
    fn from(o: aws_sdk_cloudformation::operation::describe_stacks::DescribeStacksOutput) -> Self {
        Self {
            stacks: o
                .stacks
                .unwrap_or_default()
                .iter()
                .map(From::from)
                .collect(),
        }
    }
}

impl From<&aws_sdk_cloudformation::types::Stack> for Stack {
    fn from(s: &aws_sdk_cloudformation::types::Stack) -> Self {
        Self {
            stack_id: s.stack_id.clone(),
            stack_name: s.stack_name.clone().unwrap_or_default(),
            description: s.description.clone(),
            stack_status: s.stack_status.as_ref().map(|s| s.as_str().to_owned()),
            stack_status_reason: s.stack_status_reason.clone(),
            creation_time: to_utc(s.creation_time.as_ref()),
            last_updated_time: to_utc(s.last_updated_time.as_ref()),
            parameters: s
                .parameters
                .as_ref()
                .map(|params| {
                    params
                        .iter()
                        .filter_map(|p| {
                            let key = p.parameter_key.clone()?;
                            Some((key, p.parameter_value.clone().unwrap_or_default()))
                        })
                        .collect()
                })
                .unwrap_or_default(),
            outputs: s
                .outputs
                .as_ref()
                .map(|o| o.iter().map(From::from).collect())
                .unwrap_or_default(),
            capabilities: s
                .capabilities
                .as_ref()
                .map(|c| c.iter().map(|c| c.as_str().to_owned()).collect())
                .unwrap_or_default(),
        }
    }
}

impl From<&aws_sdk_cloudformation::types::Output> for Output {
    fn from(o: &aws_sdk_cloudformation::types::Output) -> Self {
        Self {
            key: o.output_key.clone().unwrap_or_default(),
            value: o.output_value.clone().unwrap_or_default(),
            description: o.description.clone(),
        }
    }
}

impl From<aws_sdk_cloudformation::operation::describe_stack_resource::DescribeStackResourceOutput>
    for DescribeStackResourceOutput
{
    fn from(
        o: aws_sdk_cloudformation::operation::describe_stack_resource::DescribeStackResourceOutput,
    ) -> Self {
        Self {
            stack_resource_detail: o.stack_resource_detail.as_ref().map(From::from),
        }
    }
}

impl From<&aws_sdk_cloudformation::types::StackResourceDetail> for StackResourceDetail {
    fn from(r: &aws_sdk_cloudformation::types::StackResourceDetail) -> Self {
        Self {
            stack_name: r.stack_name.clone(),
            stack_id: r.stack_id.clone(),
            logical_resource_id: r.logical_resource_id.clone().unwrap_or_default(),
            physical_resource_id: r.physical_resource_id.clone(),
            resource_type: r.resource_type.clone().unwrap_or_default(),
            resource_status: r.resource_status.as_ref().map(|s| s.as_str().to_owned()),
            resource_status_reason: r.resource_status_reason.clone(),
            last_updated_timestamp: to_utc(r.last_updated_timestamp.as_ref()),
            description: r.description.clone(),
            metadata: r.metadata.clone(),
        }
    }
}

impl
    From<aws_sdk_cloudformation::operation::describe_stack_resources::DescribeStackResourcesOutput>
    for DescribeStackResourcesOutput
{
    fn from(
        o: aws_sdk_cloudformation::operation::describe_stack_resources::DescribeStackResourcesOutput,
    ) -> Self {
        Self {
            stack_resources: o
                .stack_resources
                .unwrap_or_default()
                .iter()
                .map(From::from)
                .collect(),
        }
    }
}

impl From<&aws_sdk_cloudformation::types::StackResource> for StackResource {
    fn from(r: &aws_sdk_cloudformation::types::StackResource) -> Self {
        Self {
            stack_name: r.stack_name.clone(),
            stack_id: r.stack_id.clone(),
            logical_resource_id: r.logical_resource_id.clone().unwrap_or_default(),
            physical_resource_id: r.physical_resource_id.clone(),
            resource_type: r.resource_type.clone().unwrap_or_default(),
            resource_status: r.resource_status.as_ref().map(|s| s.as_str().to_owned()),
            resource_status_reason: r.resource_status_reason.clone(),
            timestamp: to_utc(r.timestamp.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientConfig, Error, StackClient, UpdateOutcome};
    use aws_credential_types::Credentials;
    use aws_sdk_cloudformation::config::http::{HttpRequest, HttpResponse};
    use aws_smithy_http_client::test_util::{ReplayEvent, StaticReplayClient};
    use aws_smithy_types::body::SdkBody;
    use chrono::TimeZone;
    use std::convert::TryInto;

    const CREATE_STACK_RESPONSE: &str = r#"<CreateStackResponse xmlns="http://cloudformation.amazonaws.com/doc/2010-05-15/">
  <CreateStackResult>
    <StackId>STACK</StackId>
  </CreateStackResult>
  <ResponseMetadata>
    <RequestId>b9b4b068-3a41-11e5-94eb-example</RequestId>
  </ResponseMetadata>
</CreateStackResponse>"#;

    const NO_UPDATES_RESPONSE: &str = r#"<ErrorResponse xmlns="http://cloudformation.amazonaws.com/doc/2010-05-15/">
  <Error>
    <Type>Sender</Type>
    <Code>ValidationError</Code>
    <Message>No updates are to be performed.</Message>
  </Error>
  <RequestId>5ccc7dcd-744c-11e5-be70-example</RequestId>
</ErrorResponse>"#;

    const STACK_MISSING_RESPONSE: &str = r#"<ErrorResponse xmlns="http://cloudformation.amazonaws.com/doc/2010-05-15/">
  <Error>
    <Type>Sender</Type>
    <Code>ValidationError</Code>
    <Message>Stack [STACK] does not exist</Message>
  </Error>
  <RequestId>5ccc7dcd-744c-11e5-be70-example</RequestId>
</ErrorResponse>"#;

    const DESCRIBE_STACKS_RESPONSE: &str = r#"<DescribeStacksResponse xmlns="http://cloudformation.amazonaws.com/doc/2010-05-15/">
  <DescribeStacksResult>
    <Stacks>
      <member>
        <StackId>arn:aws:cloudformation:us-east-1:123456789012:stack/STACK/1</StackId>
        <StackName>STACK</StackName>
        <StackStatus>CREATE_COMPLETE</StackStatus>
        <CreationTime>2020-09-13T12:26:40Z</CreationTime>
        <Parameters>
          <member>
            <ParameterKey>key</ParameterKey>
            <ParameterValue>value</ParameterValue>
          </member>
        </Parameters>
        <Capabilities>
          <member>CAPABILITY_IAM</member>
        </Capabilities>
      </member>
    </Stacks>
  </DescribeStacksResult>
  <ResponseMetadata>
    <RequestId>b9b4b068-3a41-11e5-94eb-example</RequestId>
  </ResponseMetadata>
</DescribeStacksResponse>"#;

    fn replay(status: u16, body: &'static str) -> (StaticReplayClient, StackClient) {
        let http_client = StaticReplayClient::new(vec![ReplayEvent::new(
            HttpRequest::new(SdkBody::empty()),
            HttpResponse::new(status.try_into().unwrap(), SdkBody::from(body)),
        )]);
        let resolved = ResolvedConfig {
            profile: "default".to_string(),
            region: "us-east-1".to_string(),
        };
        let sdk_config = sdk_config(&resolved)
            .credentials_provider(Credentials::for_tests())
            .http_client(http_client.clone())
            .build();
        let client = StackClient::with_provider(
            ClientConfig::new("default", "us-east-1"),
            Client::from_conf(sdk_config),
        )
        .unwrap();
        (http_client, client)
    }

    fn request_bodies(http_client: &StaticReplayClient) -> Vec<String> {
        http_client
            .actual_requests()
            .map(|r| String::from_utf8(r.body().bytes().unwrap().to_vec()).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn create_stack_request_acknowledges_iam_without_parameters() {
        let (http_client, client) = replay(200, CREATE_STACK_RESPONSE);

        let res = client
            .create_stack("STACK", "TEMPLATE_CONTENT", &BTreeMap::new())
            .await;
        assert_eq!(res, Ok("STACK".to_string()));

        let bodies = request_bodies(&http_client);
        assert_eq!(bodies.len(), 1);
        assert!(bodies[0].contains("Action=CreateStack"), "{}", bodies[0]);
        assert!(bodies[0].contains("StackName=STACK"), "{}", bodies[0]);
        assert!(bodies[0].contains("TemplateBody=TEMPLATE_CONTENT"), "{}", bodies[0]);
        assert!(
            bodies[0].contains("Capabilities.member.1=CAPABILITY_IAM"),
            "{}",
            bodies[0]
        );
        assert!(!bodies[0].contains("Capabilities.member.2"), "{}", bodies[0]);
        assert!(!bodies[0].contains("Parameters"), "{}", bodies[0]);
    }

    #[tokio::test]
    async fn create_stack_request_carries_parameters() {
        let (http_client, client) = replay(200, CREATE_STACK_RESPONSE);
        let mut params = BTreeMap::new();
        params.insert("key".to_string(), "value".to_string());

        client
            .create_stack("STACK", "TEMPLATE_CONTENT", &params)
            .await
            .unwrap();

        let bodies = request_bodies(&http_client);
        assert!(
            bodies[0].contains("Parameters.member.1.ParameterKey=key"),
            "{}",
            bodies[0]
        );
        assert!(
            bodies[0].contains("Parameters.member.1.ParameterValue=value"),
            "{}",
            bodies[0]
        );
        assert!(
            bodies[0].contains("Capabilities.member.1=CAPABILITY_IAM"),
            "{}",
            bodies[0]
        );
    }

    #[tokio::test]
    async fn update_without_changes_is_not_an_error() {
        let (http_client, client) = replay(400, NO_UPDATES_RESPONSE);

        let res = client
            .update_stack("STACK", "TEMPLATE_CONTENT", &BTreeMap::new())
            .await;
        assert_eq!(
            res,
            Ok(UpdateOutcome::Unchanged(
                "No updates are to be performed.".to_string()
            ))
        );

        let bodies = request_bodies(&http_client);
        assert!(bodies[0].contains("Action=UpdateStack"), "{}", bodies[0]);
        assert!(
            bodies[0].contains("Capabilities.member.1=CAPABILITY_IAM"),
            "{}",
            bodies[0]
        );
        assert!(!bodies[0].contains("Parameters"), "{}", bodies[0]);
    }

    #[tokio::test]
    async fn update_of_missing_stack_keeps_service_error() {
        let (_, client) = replay(400, STACK_MISSING_RESPONSE);

        let res = client
            .update_stack("STACK", "TEMPLATE_CONTENT", &BTreeMap::new())
            .await;
        assert_eq!(
            res,
            Err(Error::Provider(ProviderError::service(
                "ValidationError",
                "Stack [STACK] does not exist"
            )))
        );
    }

    #[tokio::test]
    async fn describe_stack_parses_first_stack() {
        let (http_client, client) = replay(200, DESCRIBE_STACKS_RESPONSE);

        let stack = client.describe_stack("STACK").await.unwrap();
        assert_eq!(stack.stack_name, "STACK");
        assert_eq!(stack.stack_status.as_deref(), Some("CREATE_COMPLETE"));
        assert_eq!(
            stack.creation_time,
            Some(Utc.timestamp_opt(1_600_000_000, 0).unwrap())
        );
        assert_eq!(stack.parameters.get("key").map(String::as_str), Some("value"));
        assert_eq!(stack.capabilities, vec!["CAPABILITY_IAM".to_string()]);

        let bodies = request_bodies(&http_client);
        assert!(bodies[0].contains("Action=DescribeStacks"), "{}", bodies[0]);
        assert!(bodies[0].contains("StackName=STACK"), "{}", bodies[0]);
    }

    #[test]
    fn parameters_become_key_value_pairs() {
        let mut params = BTreeMap::new();
        params.insert("Env".to_string(), "prod".to_string());
        params.insert("Size".to_string(), "3".to_string());

        let converted = to_sdk_parameters(params);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].parameter_key(), Some("Env"));
        assert_eq!(converted[0].parameter_value(), Some("prod"));
        assert_eq!(converted[1].parameter_key(), Some("Size"));
        assert_eq!(converted[1].parameter_value(), Some("3"));
    }

    #[test]
    fn capability_strings_map_to_sdk_enum() {
        let converted = to_sdk_capabilities(&["CAPABILITY_IAM".to_string()]);
        assert_eq!(converted, vec![Capability::CapabilityIam]);
    }

    #[test]
    fn timestamps_convert_to_utc() {
        let dt = aws_smithy_types::DateTime::from_secs(1_600_000_000);
        assert_eq!(
            to_utc(Some(&dt)),
            Some(Utc.timestamp_opt(1_600_000_000, 0).unwrap())
        );
        assert_eq!(to_utc(None), None);
    }

    #[test]
    fn outputs_without_keys_default_to_empty() {
        let output = aws_sdk_cloudformation::types::Output::builder()
            .output_value("arn:aws:s3:::bucket")
            .build();
        let converted = Output::from(&output);
        assert_eq!(converted.key, "");
        assert_eq!(converted.value, "arn:aws:s3:::bucket");
        assert_eq!(converted.description, None);
    }

    #[test]
    fn empty_resource_list() {
        let output =
            aws_sdk_cloudformation::operation::describe_stack_resources::DescribeStackResourcesOutput::builder()
                .build();
        let converted = DescribeStackResourcesOutput::from(output);
        assert!(converted.stack_resources.is_empty());
    }
}
