use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use careerflow::cli::{load_input, parse_attach_arg, record_run, schema_exports, SchemaExportEntry};
use careerflow::client::{HistoryEntry, HistoryStore};
use careerflow::config::{EnvConfig, ProviderConfig};
use careerflow::flow::{default_registry, FlowEngine};
use careerflow::llm::{ModelInvoker, ScriptedClient};
use careerflow::state::FileStore;
use careerflow::utils::LoggingConfig;
use careerflow::CareerFlowError;
use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "careerflow",
    version,
    about = "Career coaching flows on the command line",
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Flows {
        #[command(subcommand)]
        command: FlowsCommand,
    },
    Schema {
        #[command(subcommand)]
        command: SchemaCommand,
    },
    /// 执行一个 flow 并输出 JSON 结果
    Run {
        flow: String,
        #[arg(long)]
        input: PathBuf,
        /// field=path，文件会编码为 data URI
        #[arg(long = "attach")]
        attach: Vec<String>,
        /// 不调用模型，使用该文件内容作为模型回复
        #[arg(long)]
        dry_run: Option<PathBuf>,
        #[arg(long)]
        no_history: bool,
    },
    /// 只校验输入并打印渲染后的 prompt
    Render {
        flow: String,
        #[arg(long)]
        input: PathBuf,
        #[arg(long = "attach")]
        attach: Vec<String>,
    },
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

#[derive(Subcommand)]
enum FlowsCommand {
    List,
    Show { name: String },
}

#[derive(Subcommand)]
enum SchemaCommand {
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
        /// 输出单行 JSON
        #[arg(long)]
        compact: bool,
    },
}

#[derive(Subcommand)]
enum HistoryCommand {
    List,
    Show { id: Uuid },
    Remove { id: Uuid },
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    LoggingConfig::init();

    let cli = Cli::parse();
    match dispatch(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(kind = err.kind(), error = %err, "command failed");
            match err {
                CareerFlowError::Config(_)
                | CareerFlowError::FlowNotRegistered(_)
                | CareerFlowError::History(_) => eprintln!("error: {err}"),
                other => eprintln!("{}", other.user_message()),
            }
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Command) -> careerflow::Result<()> {
    match command {
        Command::Flows { command } => match command {
            FlowsCommand::List => handle_flows_list(),
            FlowsCommand::Show { name } => handle_flows_show(&name),
        },
        Command::Schema { command } => match command {
            SchemaCommand::Export { output, compact } => {
                handle_schema_export(output, !compact).await
            }
        },
        Command::Run {
            flow,
            input,
            attach,
            dry_run,
            no_history,
        } => handle_run(&flow, input, &attach, dry_run, no_history).await,
        Command::Render { flow, input, attach } => handle_render(&flow, input, &attach).await,
        Command::History { command } => handle_history(command).await,
    }
}

fn handle_flows_list() -> careerflow::Result<()> {
    let registry = default_registry();
    println!("{:<22} {:<22} {}", "Name", "Title", "Description");
    for spec in registry.list() {
        println!("{:<22} {:<22} {}", spec.name(), spec.title(), spec.description());
    }
    Ok(())
}

fn handle_flows_show(name: &str) -> careerflow::Result<()> {
    let spec = default_registry().get(name)?;
    print_json(&SchemaExportEntry::from_spec(&spec), true)
}

async fn handle_schema_export(output: Option<PathBuf>, pretty: bool) -> careerflow::Result<()> {
    let entries = schema_exports(&default_registry());
    match output {
        Some(path) => {
            let content = to_json(&entries, pretty)?;
            tokio::fs::write(&path, content).await.map_err(|e| {
                CareerFlowError::Config(format!("failed to write `{}`: {e}", path.display()))
            })?;
            println!("Schema exported to `{}`", path.display());
            Ok(())
        }
        None => print_json(&entries, pretty),
    }
}

async fn handle_run(
    flow: &str,
    input: PathBuf,
    attach: &[String],
    dry_run: Option<PathBuf>,
    no_history: bool,
) -> careerflow::Result<()> {
    let attachments = attach
        .iter()
        .map(|arg| parse_attach_arg(arg))
        .collect::<careerflow::Result<Vec<_>>>()?;
    let value = load_input(&input, &attachments).await?;

    let scripted = dry_run.is_some();
    let invoker = match dry_run {
        Some(path) => {
            let reply = tokio::fs::read_to_string(&path).await.map_err(|e| {
                CareerFlowError::Config(format!("failed to read `{}`: {e}", path.display()))
            })?;
            ModelInvoker::new(Arc::new(ScriptedClient::new().with_content(reply)))
        }
        None => {
            let config = ProviderConfig::from_env()?;
            ModelInvoker::new(config.build_client()?).with_defaults(config.model_defaults())
        }
    };
    let engine = FlowEngine::new(default_registry(), invoker);

    let output = engine.execute(flow, value.clone()).await?;
    print_json(&output, true)?;

    if !no_history {
        let title = engine.registry().get(flow)?.title().to_string();
        let entry = HistoryEntry::new(flow, title, value, output);
        record_run(&history_store(), entry, scripted).await;
    }
    Ok(())
}

async fn handle_render(flow: &str, input: PathBuf, attach: &[String]) -> careerflow::Result<()> {
    let attachments = attach
        .iter()
        .map(|arg| parse_attach_arg(arg))
        .collect::<careerflow::Result<Vec<_>>>()?;
    let value = load_input(&input, &attachments).await?;

    let engine = FlowEngine::with_client(Arc::new(ScriptedClient::new()));
    let prompt = engine.render(flow, &value)?;
    if let Some(system) = &prompt.system {
        println!("--- system ---\n{system}\n");
    }
    println!("--- user ---\n{}", prompt.user);
    if !prompt.attachments.is_empty() {
        println!("\n--- attachments: {} ---", prompt.attachments.len());
    }
    Ok(())
}

async fn handle_history(command: HistoryCommand) -> careerflow::Result<()> {
    let history = history_store();
    match command {
        HistoryCommand::List => {
            let entries = history.list().await?;
            if entries.is_empty() {
                println!("No history yet.");
            }
            for entry in entries {
                println!(
                    "{}  {}  {:<20} {}",
                    entry.id,
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    entry.flow,
                    entry.title
                );
            }
        }
        HistoryCommand::Show { id } => match history.get(id).await? {
            Some(entry) => print_json(&entry, true)?,
            None => return Err(CareerFlowError::History(format!("no history entry `{id}`"))),
        },
        HistoryCommand::Remove { id } => {
            if !history.remove(id).await? {
                return Err(CareerFlowError::History(format!("no history entry `{id}`")));
            }
            println!("Removed `{id}`");
        }
        HistoryCommand::Clear => {
            history.clear().await?;
            println!("History cleared");
        }
    }
    Ok(())
}

fn history_store() -> HistoryStore {
    HistoryStore::new(Arc::new(FileStore::new(EnvConfig::history_dir())))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> careerflow::Result<String> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|e| CareerFlowError::Other(e.into()))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> careerflow::Result<()> {
    println!("{}", to_json(value, pretty)?);
    Ok(())
}
