use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::{self, ConfigError};
use crate::contract::{CoreEvent, CoreRequest, SearchRequest};
use crate::core_service::{CoreService, ServiceError};
use crate::providers::Permissions;
use crate::transport::{encode, handle_json, handle_request};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Serve,
    Query(String),
    ZeroState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub mode: Mode,
    pub write_default_config: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        config_path: None,
        mode: Mode::Serve,
        write_default_config: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config requires a path")?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--query" => {
                let value = iter.next().ok_or("--query requires a value")?;
                options.mode = Mode::Query(value.clone());
            }
            "--zero-state" => options.mode = Mode::ZeroState,
            "--write-default-config" => options.write_default_config = true,
            other => {
                if let Some(value) = other.strip_prefix("--config=") {
                    options.config_path = Some(PathBuf::from(value));
                } else if let Some(value) = other.strip_prefix("--query=") {
                    options.mode = Mode::Query(value.to_string());
                } else {
                    return Err(format!("unknown argument: {other}"));
                }
            }
        }
    }

    Ok(options)
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let config = config::load(options.config_path.as_deref())?;
    if options.write_default_config && !config.config_path.exists() {
        config::save(&config)?;
        info!(path = %config.config_path.display(), "wrote default config");
    }
    info!(
        config_path = %config.config_path.display(),
        history_db_path = %config.history_db_path.display(),
        "starting launchsearch core"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let service = CoreService::new(config, Permissions::all())?;
        match options.mode {
            Mode::Serve => serve_stdio(&service).await,
            Mode::Query(query) => {
                run_once(&service, CoreRequest::Search(SearchRequest { query })).await
            }
            Mode::ZeroState => run_once(&service, CoreRequest::ZeroState).await,
        }
    })
}

async fn run_once(service: &CoreService, request: CoreRequest) -> Result<(), RuntimeError> {
    let (events, mut rx) = mpsc::unbounded_channel::<CoreEvent>();
    let response = handle_request(service, request, &events);
    let mut stdout = tokio::io::stdout();
    stdout.write_all(encode(&response).as_bytes()).await?;
    stdout.write_all(b"\n").await?;

    if let Some(event) = rx.recv().await {
        stdout.write_all(encode(&event).as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}

async fn serve_stdio(service: &CoreService) -> Result<(), RuntimeError> {
    let (events, mut event_rx) = mpsc::unbounded_channel::<CoreEvent>();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err()
                || stdout.write_all(b"\n").await.is_err()
                || stdout.flush().await.is_err()
            {
                warn!("stdout closed, stopping writer");
                break;
            }
        }
    });

    let event_lines = out_tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if event_lines.send(encode(&event)).is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let response = handle_json(service, trimmed, &events);
        if out_tx.send(response).is_err() {
            break;
        }
    }

    service.aggregator().cancel(true);
    drop(events);
    drop(out_tx);
    let _ = forwarder.await;
    let _ = writer.await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_args, Mode};
    use std::path::PathBuf;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn defaults_to_serve_mode() {
        let options = parse_cli_args(&[]).unwrap();
        assert_eq!(options.mode, Mode::Serve);
        assert!(options.config_path.is_none());
    }

    #[test]
    fn parses_query_and_config() {
        let options = parse_cli_args(&args(&["--config", "/tmp/c.toml", "--query=maps"])).unwrap();
        assert_eq!(options.config_path, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(options.mode, Mode::Query("maps".into()));
    }

    #[test]
    fn rejects_unknown_and_incomplete_args() {
        assert!(parse_cli_args(&args(&["--bogus"])).is_err());
        assert!(parse_cli_args(&args(&["--query"])).is_err());
    }
}
