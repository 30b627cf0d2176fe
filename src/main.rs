use clap::Parser;
use orchestrator_exporter::{Config, GaugeStore, HealthPoller, MetricsServer, ProcessCollector};
use std::{io::Write, process::ExitCode, sync::Arc};
use tokio::sync::watch;

const USAGE_ERROR: u8 = 1;

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "[orchestrator_exporter] {} {}:{} {} {}",
                buf.timestamp_seconds(),
                record.module_path().unwrap_or_default(),
                record.line().unwrap_or_default(),
                record.level(),
                record.args()
            )
        })
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(USAGE_ERROR);
        }
    };
    init_logging();

    let store = Arc::new(GaugeStore::new());
    let process = Arc::new(ProcessCollector::new(&store));
    let (stop, shutdown) = watch::channel(false);

    let server_shutdown = shutdown.clone();
    let listen = config.listen.clone();
    let server_store = Arc::clone(&store);
    let server = tokio::spawn(async move {
        let result = match MetricsServer::bind(&listen, server_store, process).await {
            Ok(server) => server.serve(server_shutdown).await,
            Err(e) => Err(e),
        };
        // polling carries on without the endpoint
        if let Err(e) = result {
            log::error!("{e}");
        }
    });

    tokio::spawn(async move {
        shutdown_signal().await;
        log::info!("Shutdown signal received");
        let _ = stop.send(true);
    });

    match HealthPoller::new(&config, store).run(shutdown).await {
        Ok(()) => {
            let _ = server.await;
            ExitCode::SUCCESS
        }
        Err(e) => ExitCode::from(e.exit_code()),
    }
}
