mod cli;

use std::sync::Arc;

use clap::Parser;
use eyre::{eyre, WrapErr};
use qtum_rpc_core::{ClientConfig, LogLevel, MethodTable, RpcClient, TracingLogger};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,qtum_rpc=debug")),
        )
        .with_writer(std::io::stderr)
        .with_level(true)
        .init();

    let config = args.client_config();
    let log_level = args.log_level;

    let output = match args.command {
        cli::Command::Methods => {
            print_methods(&MethodTable::builtin());
            return Ok(());
        }
        cli::Command::Call { method, args } => {
            let client = connect(config, log_level)?;
            let params = args.iter().map(String::as_str).map(cli::parse_arg).collect();
            client
                .invoke(&method, params)
                .await
                .wrap_err_with(|| format!("while calling `{method}` on {}", client.endpoint()))?
        }
        cli::Command::Batch { calls } => {
            let calls = calls
                .iter()
                .map(|spec| {
                    cli::parse_call_spec(spec).ok_or_else(|| eyre!("empty --call specification"))
                })
                .collect::<eyre::Result<Vec<_>>>()?;
            let client = connect(config, log_level)?;
            let responses = client
                .with_batch(|batch| {
                    for (method, params) in calls {
                        batch.call(&method, params)?;
                    }
                    Ok(())
                })
                .await
                .wrap_err_with(|| format!("while sending batch to {}", client.endpoint()))?;
            Value::Array(
                responses
                    .into_iter()
                    .map(|r| json!({ "id": r.id, "result": r.result, "error": r.error }))
                    .collect(),
            )
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("render result")?
    );
    Ok(())
}

fn connect(config: ClientConfig, log_level: LogLevel) -> eyre::Result<RpcClient> {
    tracing::debug!(endpoint = %config.endpoint(), "connecting to node");
    let logger = Arc::new(TracingLogger::new(log_level));
    RpcClient::new(config, logger).context("build RPC client")
}

fn print_methods(table: &MethodTable) {
    for spec in table.iter() {
        let tags: Vec<&str> = spec.tags.iter().map(|tag| tag.as_str()).collect();
        println!("{:<28} {}", spec.name, tags.join(" "));
    }
}
