//! ShellPilot - An interactive command-line assistant
//!
//! Binary entry point: argument parsing, logging setup, configuration
//! loading, and session assembly.

use std::env;
use std::path::PathBuf;
use std::process;

use tracing::error;
use tracing_subscriber::EnvFilter;

use shellpilot::config::ConfigLoader;
use shellpilot::error::Result;
use shellpilot::files::DiskFileWriter;
use shellpilot::model::openai::starter_prompt;
use shellpilot::model::OpenAiClient;
use shellpilot::shell::ShellSession;
use shellpilot::ui::ConsoleUi;
use shellpilot::Assistant;

/// Parsed command-line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug output from the start
    debug: bool,
    /// Shell program override
    shell: Option<String>,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> std::result::Result<Self, String> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    i += 1;
                    let value = args
                        .get(i)
                        .ok_or_else(|| "--config requires a path".to_string())?;
                    app_args.config_path = Some(PathBuf::from(value));
                }
                "--shell" | "-s" => {
                    i += 1;
                    let value = args
                        .get(i)
                        .ok_or_else(|| "--shell requires a program name".to_string())?;
                    app_args.shell = Some(value.clone());
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--version" | "-V" => {
                    println!("{} {}", shellpilot::NAME, shellpilot::VERSION);
                    process::exit(0);
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                other => {
                    return Err(format!("Unknown argument: {}", other));
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

fn print_help() {
    println!("{} {}", shellpilot::NAME, shellpilot::VERSION);
    println!("An interactive command-line assistant that turns natural-language");
    println!("requests into shell commands.");
    println!();
    println!("USAGE:");
    println!("    shellpilot [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Use a specific configuration file");
    println!("    -s, --shell <PROGRAM>  Shell program to drive (bash, cmd.exe, pwsh)");
    println!("    -d, --debug            Start with debug output enabled");
    println!("    -V, --version          Print version information");
    println!("    -h, --help             Print this help text");
}

async fn run(args: AppArgs) -> Result<()> {
    let mut config = match &args.config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(shell) = args.shell {
        config.shell.program = shell;
    }
    if args.debug {
        config.debug = true;
    }

    config.validate()?;

    let ui = ConsoleUi::new(config.debug);
    let model = OpenAiClient::new(&config.model, &starter_prompt(&config.shell.program));
    let session = ShellSession::create(&config.shell.program).await?;
    let writer = DiskFileWriter;

    let mut assistant = Assistant::new(ui, model, session, writer);
    assistant.run().await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match AppArgs::parse() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Use --help for usage information.");
            process::exit(2);
        }
    };

    if let Err(err) = run(args).await {
        error!("startup failed: {}", err);
        eprintln!("{}", err);
        process::exit(1);
    }
}
