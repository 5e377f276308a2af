use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use biotools::{
    BioAgent, BiotoolsServer, ChatProvider, Config, Executor, ProviderKind, ToolRegistry,
    serve_stdio,
};

#[derive(Parser)]
#[command(name = "biotools")]
#[command(version)]
#[command(about = "Bioinformatics tools for LLM agents and MCP clients", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./biotools.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the agent work towards a goal with the bioinformatics tools
    Run {
        /// The goal, in natural language
        goal: String,

        /// LLM provider to use (anthropic, openai, azure)
        #[arg(long)]
        provider: Option<ProviderKind>,

        /// Model to use (deployment id for azure)
        #[arg(long)]
        model: Option<String>,

        /// Maximum number of tool steps
        #[arg(long)]
        max_steps: Option<usize>,
    },
    /// Serve the tools over MCP on stdin/stdout
    Serve,
    /// List the available tools
    Tools,
    /// Invoke one tool directly and print its reply
    Call {
        /// Tool name, as listed by `tools`
        tool: String,

        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },
}

// Logs go to stderr; stdout carries the MCP transport and the final answer
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive("info".parse().expect("valid log directive"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Run {
            goal,
            provider,
            model,
            max_steps,
        } => {
            if let Some(p) = provider {
                config.llm.provider = p;
            }
            if model.is_some() {
                config.llm.model = model;
            }
            if let Some(n) = max_steps {
                config.agent.max_steps = n;
            }

            info!(provider = %config.llm.provider, max_steps = config.agent.max_steps, "starting run");

            let provider =
                ChatProvider::from_config(&config.llm).context("failed to create LLM provider")?;
            let executor = Executor::new(ToolRegistry::bioinformatics(&config.binaries));
            let agent = BioAgent::new(config.agent.clone());

            match executor.run(&agent, &goal, &provider).await {
                Ok(answer) => println!("\n{}", answer),
                Err(e) => {
                    error!(error = %e, "run failed");
                    std::process::exit(1);
                }
            }
        }
        Commands::Serve => {
            let server = BiotoolsServer::new(ToolRegistry::bioinformatics(&config.binaries));
            serve_stdio(server).await?;
        }
        Commands::Tools => {
            let registry = ToolRegistry::bioinformatics(&config.binaries);
            for tool in registry.all() {
                println!("{:<22} {}", tool.name(), tool.description());
            }
        }
        Commands::Call { tool, args } => {
            let params: serde_json::Value =
                serde_json::from_str(&args).context("tool arguments must be a JSON object")?;
            let registry = ToolRegistry::bioinformatics(&config.binaries);
            let tool = registry
                .get(&tool)
                .with_context(|| format!("unknown tool: {}", tool))?;
            println!("{}", tool.execute(params).await?);
        }
    }

    Ok(())
}
