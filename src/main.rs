//! sqlexec - run SQL against a remote query service.

mod cli;
mod render;

use cli::{read_input, Cli, Command};
use sqlexec::app::Console;
use sqlexec::config::Config;
use sqlexec::credentials;
use sqlexec::error::{Result, SqlExecError};
use sqlexec::highlight::{theme, BlockHighlighter};
use sqlexec::logging;
use sqlexec::query::{MockTransport, QueryClient};
use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if cli.log_file {
        logging::init_file_logging();
    } else {
        logging::init_stderr_logging();
    }

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Returns false when the command ran but the query failed.
async fn run(cli: Cli) -> Result<bool> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());

    match cli.command {
        Command::Run {
            query,
            file,
            export,
            copy,
            tsv,
            mock_response,
        } => {
            let config = Config::load(&config_path)?;
            let text = read_input(query.as_deref(), file.as_ref())?;
            run_query(&config, &text, mock_response, export, copy, tsv).await
        }
        Command::Highlight { file } => {
            let text = read_input(None, file.as_ref())?;
            print_highlighted(&text);
            Ok(true)
        }
        Command::StorePassword { password } => {
            let config = Config::load(&config_path)?;
            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };
            credentials::store_password(&config.endpoint, &password)?;
            println!(
                "Password stored for {}.",
                config.endpoint.display_string()
            );
            Ok(true)
        }
    }
}

async fn run_query(
    config: &Config,
    text: &str,
    mock_response: Option<PathBuf>,
    export: Option<PathBuf>,
    copy: bool,
    tsv: bool,
) -> Result<bool> {
    let mut console = match mock_response {
        Some(path) => {
            let body = std::fs::read_to_string(&path).map_err(|e| {
                SqlExecError::config(format!("Failed to read {}: {e}", path.display()))
            })?;
            let client = QueryClient::new(Arc::new(MockTransport::new().with_response(200, body)));
            Console::new(client, config.results.date_policy)
        }
        None => Console::from_config(config)?,
    };

    let message = console.run(text).await.to_string();

    if let Some(model) = console.model() {
        if tsv {
            println!("{}", console.clipboard_text()?);
        } else {
            println!("{}", render::render_grid(model));
        }
    }
    println!("{message}");

    if console.last_failed() {
        return Ok(false);
    }

    if copy {
        // Failure is already reported on the message line.
        let _ = console.copy_to_clipboard();
        println!("{}", console.message());
    }

    if let Some(path) = export {
        let result = console.export(Some(&path));
        println!("{}", console.message());
        if result.is_err() {
            return Ok(false);
        }
    }

    Ok(true)
}

fn print_highlighted(text: &str) {
    let color = std::io::stdout().is_terminal();
    let mut highlighter = BlockHighlighter::new();

    for (line, spans) in text.lines().zip(highlighter.highlight_document(text)) {
        if color {
            println!("{}", theme::paint_line(line, &spans));
        } else {
            println!("{line}");
        }
    }
}

fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| SqlExecError::internal(format!("Failed to read password: {e}")))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
