mod cmd;
mod home;
mod output;

use clap::{Parser, Subcommand};
use cmd::list::ScopeArgs;
use cmd::serve::ServeArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "claude-manager",
    about = "Browse Claude Code agents, commands, hooks and MCP servers across your projects",
    version,
    propagate_version = true
)]
struct Cli {
    /// Home directory containing .claude.json and .claude/ (defaults to $HOME)
    #[arg(long, global = true, env = "CLAUDE_MANAGER_HOME")]
    home: Option<PathBuf>,

    /// Output JSON instead of tables
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard (default)
    Serve(ServeArgs),

    /// List projects registered in ~/.claude.json
    Projects,

    /// List agents for a project, or user agents
    Agents(ScopeArgs),

    /// List slash commands for a project, or user commands
    Commands(ScopeArgs),

    /// List hooks for a project, or user hooks
    Hooks(ScopeArgs),

    /// List MCP servers for a project, or user servers
    Mcp(ScopeArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        None | Some(Commands::Serve(_)) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = home::resolve_home(cli.home.as_deref()).and_then(|home| match cli.command {
        None => cmd::serve::run(&home, &cli.serve),
        Some(Commands::Serve(args)) => cmd::serve::run(&home, &args),
        Some(Commands::Projects) => cmd::projects::run(&home, cli.json),
        Some(Commands::Agents(scope)) => cmd::list::agents(&home, &scope, cli.json),
        Some(Commands::Commands(scope)) => cmd::list::commands(&home, &scope, cli.json),
        Some(Commands::Hooks(scope)) => cmd::list::hooks(&home, &scope, cli.json),
        Some(Commands::Mcp(scope)) => cmd::list::mcp(&home, &scope, cli.json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
