use cfstack::{ClientConfig, ParameterSet, StackClient, UpdateOutcome};
use eyre::{Result, WrapErr};
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

mod render;

// Custom parser for `KEY=VALUE` template parameters.
fn parse_parameter(src: &str) -> Result<(String, String)> {
    match src.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(eyre::eyre!("expected KEY=VALUE, got {:?}", src)),
    }
}

#[derive(StructOpt)]
#[structopt(about = "Create, update and describe CloudFormation stacks")]
struct Opts {
    /// Named profile to take credentials from
    #[structopt(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Region to send requests to
    #[structopt(long, env = "AWS_REGION")]
    region: Option<String>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Create a stack from a template file
    Create(TemplateArgs),
    /// Update a stack from a template file
    Update(TemplateArgs),
    /// Show the status, parameters and outputs of a stack
    Describe { stack_name: String },
    /// Show a single resource of a stack
    Resource {
        stack_name: String,
        logical_id: String,
    },
    /// List the resources of a stack
    Resources { stack_name: String },
}

#[derive(StructOpt)]
struct TemplateArgs {
    stack_name: String,

    #[structopt(parse(from_os_str))]
    template: PathBuf,

    /// Template parameter, may be repeated
    #[structopt(short, long = "parameter", parse(try_from_str = parse_parameter))]
    parameters: Vec<(String, String)>,
}

impl TemplateArgs {
    fn load(&self) -> Result<(String, ParameterSet)> {
        let template = std::fs::read_to_string(&self.template)
            .wrap_err_with(|| format!("reading template {}", self.template.display()))?;
        let parameters = self.parameters.iter().cloned().collect();
        Ok((template, parameters))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    color_eyre::install()?;

    let opts = Opts::from_args();
    let config = ClientConfig {
        profile: opts.profile,
        region: opts.region,
    };
    let client = StackClient::new(config).wrap_err("building stack client")?;
    tracing::debug!(region = %client.region(), "chosen region");

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    match opts.command {
        Command::Create(args) => {
            let (template, parameters) = args.load()?;
            let stack_id = client
                .create_stack(&args.stack_name, &template, &parameters)
                .await
                .wrap_err("creating stack")?;
            writeln!(stdout, "{}", stack_id).wrap_err("printing stack id")?;
        }
        Command::Update(args) => {
            let (template, parameters) = args.load()?;
            let outcome = client
                .update_stack(&args.stack_name, &template, &parameters)
                .await
                .wrap_err("updating stack")?;
            match outcome {
                UpdateOutcome::Updated(output) => {
                    let stack_id = output.stack_id.unwrap_or(args.stack_name);
                    writeln!(stdout, "{}", stack_id).wrap_err("printing stack id")?;
                }
                UpdateOutcome::Unchanged(message) => {
                    writeln!(stdout, "{}", message).wrap_err("printing message")?;
                }
            }
        }
        Command::Describe { stack_name } => {
            let stack = client
                .describe_stack(&stack_name)
                .await
                .wrap_err("describing stack")?;
            render::stack(&mut stdout, &stack)?;
        }
        Command::Resource {
            stack_name,
            logical_id,
        } => {
            let detail = client
                .describe_stack_resource(&stack_name, &logical_id)
                .await
                .wrap_err("describing stack resource")?;
            render::resource_detail(&mut stdout, &detail)?;
        }
        Command::Resources { stack_name } => {
            let resources = client
                .describe_stack_resources(&stack_name)
                .await
                .wrap_err("describing stack resources")?;
            render::resources(&mut stdout, &resources)?;
        }
    }

    Ok(())
}
