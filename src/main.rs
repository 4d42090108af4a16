use anyhow::{bail, Context, Result};
use axum::serve;
use roombook::core::config::Config;
use roombook::core::state::AppState;
use roombook::core::startup::{load_schedule, open_store};
use roombook::core::{routes, tracing_init};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::{TcpListener, UnixListener};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("config.toml")
    };

    // Load and validate configuration
    let config = Config::from_file(&config_path).context(format!(
        "Failed to load configuration from '{}'. \
        If this is your first time running the server, copy config.example.toml to config.toml and adjust the values.",
        config_path.display()
    ))?;

    tracing_init::init_tracing(&config.logging);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.num_threads)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        port = ?config.server.port,
        unix_socket = ?config.server.unix_socket,
        num_threads = config.server.num_threads,
        rooms = ?config.booking.rooms,
        log_level = %config.logging.level,
        log_format = %config.logging.format,
        "Room booking server starting"
    );

    let store = open_store(&config)?;
    let schedule = load_schedule(&config)?;

    let state = Arc::new(AppState::new(&config, store, schedule));

    info!(
        open_time = %config.booking.open_time,
        close_time = %config.booking.close_time,
        admin_tokens = config.admin.tokens.len(),
        "Room booking server startup complete"
    );

    let app = routes::build_router(state).layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        ),
    );

    let tcp_handle = if let Some(port) = config.server.port {
        let addr = format!("0.0.0.0:{}", port);
        info!(address = %addr, "Starting TCP listener");

        let listener = TcpListener::bind(&addr)
            .await
            .context(format!("Failed to bind TCP listener to {}", addr))?;

        let app_clone = app.clone();
        Some(tokio::spawn(async move {
            serve(
                listener,
                app_clone.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("TCP server error")
        }))
    } else {
        None
    };

    let unix_handle = if let Some(unix_socket) = &config.server.unix_socket {
        info!(path = %unix_socket.display(), "Starting Unix socket listener");

        if unix_socket.exists() {
            std::fs::remove_file(unix_socket).context(format!(
                "Failed to remove existing Unix socket: {}",
                unix_socket.display()
            ))?;
        }

        let listener = UnixListener::bind(unix_socket).context(format!(
            "Failed to bind Unix socket listener to {}",
            unix_socket.display()
        ))?;

        let mut make_service = app.into_make_service();
        Some(tokio::spawn(async move {
            use tower::Service;

            loop {
                let (socket, _remote_addr) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!(error = %e, "Failed to accept Unix socket connection");
                        continue;
                    }
                };

                let tower_service = match make_service.call(&socket).await {
                    Ok(svc) => svc,
                    Err(infallible) => match infallible {},
                };

                tokio::spawn(async move {
                    let socket = hyper_util::rt::TokioIo::new(socket);

                    let hyper_service =
                        hyper::service::service_fn(move |request: hyper::Request<hyper::body::Incoming>| {
                            tower_service.clone().call(request)
                        });

                    if let Err(err) =
                        hyper_util::server::conn::auto::Builder::new(hyper_util::rt::TokioExecutor::new())
                            .serve_connection(socket, hyper_service)
                            .await
                    {
                        error!(error = %err, "Error serving Unix socket connection");
                    }
                });
            }
        }))
    } else {
        None
    };

    info!("HTTP server(s) started, waiting for shutdown signal");

    match (tcp_handle, unix_handle) {
        (Some(tcp), Some(unix)) => {
            tokio::select! {
                result = tcp => {
                    if let Err(e) = result {
                        error!(error = %e, "TCP server task failed");
                    }
                }
                result = unix => {
                    if let Err(e) = result {
                        error!(error = %e, "Unix socket server task failed");
                    }
                }
            }
        }
        (Some(tcp), None) => {
            if let Err(e) = tcp.await {
                error!(error = %e, "TCP server task failed");
            }
        }
        (None, Some(unix)) => {
            if let Err(e) = unix.await {
                error!(error = %e, "Unix socket server task failed");
            }
        }
        (None, None) => {
            error!("No listeners configured");
            bail!("No listeners configured");
        }
    }

    info!("Shutting down gracefully");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
