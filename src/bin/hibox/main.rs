use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};

use hibox::commands::ExecutionModel;
use hibox::pty::{ShellHost, messages};
use hibox::runner::StepRunner;
use hibox::workspace;

#[derive(Parser, Debug)]
#[command(
    name = "hibox",
    about = "Run configured command sequences in persistent shell sessions"
)]
struct Cli {
    /// Trigger location holding hibox.json (defaults to the current directory)
    path: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let roots = workspace_roots();
    let paths = workspace::resolve(cli.path.as_deref(), &roots)?;
    let spec = hibox::load_custom_command(&paths.config_path)?;

    let model = ExecutionModel::from_name(&spec.model);
    if model.is_none() {
        warn!(
            "Unknown execution model '{}', steps will not dispatch",
            spec.model
        );
    }

    info!(
        "Running {} steps for project {}",
        spec.list.len(),
        paths.project_path.display()
    );
    let mut runner = StepRunner::new(ShellHost::default(), model, paths.project_path.clone());
    runner.run(&spec.list, 0).await;

    // Sessions stay open for inspection until the host goes away
    println!("{}", messages::format_finished_message());
    tokio::signal::ctrl_c().await?;
    Ok(ExitCode::SUCCESS)
}

/// The ambient workspace: the current directory is the sole root folder.
fn workspace_roots() -> Vec<PathBuf> {
    std::env::current_dir().map_or_else(|_| Vec::new(), |cwd| vec![cwd])
}
