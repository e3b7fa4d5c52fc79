//! `depscout [BATCH_FILE...]`
//!
//! Each `BATCH_FILE` (or stdin when none is given) holds a JSON array of
//! dependencies and is searched as one batch; up to
//! `max_concurrent_searches` batches are looked up in OSS Index at once.
//! One JSON record per vulnerable dependency is printed on stdout.
//!
//! `DEPSCOUT_CONFIG` may point at a JSON config file; `DEPSCOUT_*`
//! variables override it.

use depscout::config::Config;
use depscout::logging::init_logging;
use depscout::ossindex::OssIndexClient;
use depscout::{vulnerability_channel, Dependency, SearchExecutor, VulnerabilitySearcher};
use std::io::Read;
use std::process::ExitCode;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn load_config() -> Result<Config, BoxError> {
    let config = match std::env::var("DEPSCOUT_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::default(),
    };
    Ok(config.merge_env()?)
}

fn read_batch(path: Option<String>) -> Result<Vec<Dependency>, BoxError> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

fn read_batches(paths: Vec<String>) -> Result<Vec<Vec<Dependency>>, BoxError> {
    if paths.is_empty() {
        return Ok(vec![read_batch(None)?]);
    }
    paths.into_iter().map(|path| read_batch(Some(path))).collect()
}

async fn run(config: Config, batches: Vec<Vec<Dependency>>) -> Result<usize, BoxError> {
    let client = OssIndexClient::new(&config.oss_index)?;
    let (sink, mut rx) = vulnerability_channel(config.search.channel_capacity)?;
    let executor = SearchExecutor::new(
        VulnerabilitySearcher::new(client, sink),
        config.search.max_concurrent_searches,
    );

    let printer = tokio::spawn(async move {
        let mut printed = 0usize;
        let mut stdout = tokio::io::stdout();
        while let Some(record) = rx.recv().await {
            let mut line = serde_json::to_vec(&record)?;
            line.push(b'\n');
            stdout.write_all(&line).await?;
            printed += 1;
        }
        stdout.flush().await?;
        Ok::<_, BoxError>(printed)
    });

    let result = executor.execute_all(batches).await;
    // Dropping the executor closes the sink and lets the printer finish.
    drop(executor);
    let printed = printer.await??;
    result?;
    Ok(printed)
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("depscout: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging);

    let batches = match read_batches(std::env::args().skip(1).collect()) {
        Ok(batches) => batches,
        Err(e) => {
            error!(error = %e, "failed to read dependency batch");
            return ExitCode::FAILURE;
        }
    };

    info!(
        batches = batches.len(),
        dependencies = batches.iter().map(Vec::len).sum::<usize>(),
        "searching for vulnerable dependencies"
    );
    match run(config, batches).await {
        Ok(printed) => {
            info!(vulnerable = printed, "search finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "search failed");
            ExitCode::FAILURE
        }
    }
}
