use std::path::PathBuf;

use anyhow::{Result, anyhow};
use futures::FutureExt as _;
use movies_server::{
    config::{Parser, ServerConfig},
    run::{build_state, run_graceful_with_state},
};
use rand::Rng as _;
use reqwest::Url;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tracing::{debug, error};

pub mod rest;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, std::time::Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

/// Keeps test data directory alive, it is removed on drop
pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

pub fn test_config(
    test_name: &str,
    base_dir: &std::path::Path,
    extra_args: &[&str],
) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix_in(format!("{}_", test_name), base_dir)?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?.to_string();
    let base_url = format!("http://127.0.0.1:{}", port);
    let mut args = vec![
        "movies-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
        "--base-url",
        &base_url,
    ];
    args.extend_from_slice(extra_args);
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

fn test_data_dir() -> Result<PathBuf> {
    let dir = std::env::temp_dir().join("movies-e2e-tests");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Config backed by SQLite database in fresh temporary directory
pub async fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    test_config(test_name, &test_data_dir()?, &[])
}

/// Config using in-memory store
pub async fn prepare_memory_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    test_config(test_name, &test_data_dir()?, &["--in-memory"])
}

/// Stops server when dropped
pub struct ServerGuard {
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

pub async fn spawn_server(args: ServerConfig) -> Result<ServerGuard> {
    let health_url = args.base_url.join("health")?;
    let state = build_state(&args).await?;
    let (shutdown, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        if let Err(e) = run_graceful_with_state(args, state, shutdown_rx.map(|_| ())).await {
            error!("Server failed: {e}");
        }
    });

    let client = reqwest::Client::new();
    for _ in 0..50 {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Server is ready");
                return Ok(ServerGuard {
                    shutdown: Some(shutdown),
                });
            }
            _ => tokio::time::sleep(std::time::Duration::from_millis(100)).await,
        }
    }

    Err(anyhow!("Server did not start"))
}

pub async fn launch_env(args: ServerConfig) -> Result<(reqwest::Client, ServerGuard)> {
    let guard = spawn_server(args).await?;
    let client = reqwest::Client::builder().build()?;
    Ok((client, guard))
}

pub fn extend_url(url: &Url, segment: impl std::fmt::Display) -> Url {
    let mut url = url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&segment.to_string());
    }
    url
}
