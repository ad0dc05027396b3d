use std::{
    io::{self, Write},
    sync::Arc,
};

use admin_stats::{AdminClient, SnapshotSource};
use chrono::Local;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use envoystat::{render, FetchFailurePolicy, Sampler, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let settings = Settings::from_args()?;

    // Logs go to stderr or a file so they never interleave with the table on stdout
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt().with_env_filter(env_filter);

    if let Some(log_file) = &settings.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .map_err(|e| format!("Failed to open log file {}: {}", log_file.display(), e))?;
        fmt_layer.with_ansi(false).with_writer(Arc::new(file)).init();
    } else {
        fmt_layer.with_writer(io::stderr).init();
    }

    let client = AdminClient::new(&settings.admin, settings.timeout)?;

    info!("Admin interface: {}", client.base_url());
    info!("Sample interval: {:?}", settings.interval);
    info!("Request timeout: {:?}", settings.timeout);
    info!("Fetch failure policy: {:?}", settings.on_fetch_error);
    let mut out = io::stdout().lock();

    if settings.list_fields {
        let snapshot = client.fetch_snapshot().await?;
        let listing = render::field_listing(snapshot.names_with_prefix(&settings.prefix));
        out.write_all(listing.as_bytes())?;
        return Ok(());
    }

    let server_info = match client.server_info().await {
        Ok(body) => body,
        Err(e) if settings.on_fetch_error == FetchFailurePolicy::Abort => return Err(e.into()),
        Err(e) => {
            warn!("Failed to fetch server info: {}", e);
            format!("(server info unavailable: {})", e)
        }
    };
    writeln!(out, "{}", render::banner(&Local::now().naive_local(), &server_info))?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Interrupt received, stopping after the current tick"),
            Err(e) => {
                error!("Unable to listen for interrupt signal: {}", e);
                // we also shut down in case of error
            }
        }
        signal_token.cancel();
    });

    let mut sampler = Sampler::new(
        client,
        out,
        settings.fields,
        settings.interval,
        settings.on_fetch_error,
    );

    if let Err(e) = sampler.run(shutdown).await {
        error!("Sampling aborted: {}", e);
        return Err(e.into());
    }

    Ok(())
}
