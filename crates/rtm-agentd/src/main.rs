mod config;

use std::sync::Arc;

use axum::{
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use rtm_api::{HttpApi, RuntimeApiAdapter};
use rtm_core::{BatchOrchestrator, MetricsHandle, PodQueryService, RuntimeExecutor};
use rtm_exec::SubprocessRunner;
use rtm_kube::{KubePodSource, connect};
use rtm_observe::{LoggerTimeZone, init_logger, resolve_local_offset};
use rtm_prometheus::PrometheusMetrics;

use crate::config::ServiceConfig;

fn main() -> anyhow::Result<()> {
    let cfg = ServiceConfig::from_env()?;

    // Offset detection is refused once other threads exist.
    if cfg.logger.tz == LoggerTimeZone::Local {
        resolve_local_offset();
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cfg))
}

async fn run(cfg: ServiceConfig) -> anyhow::Result<()> {
    init_logger(&cfg.logger)?;
    info!(listen = %cfg.listen, helm = %cfg.helm.binary, "logger initialized");

    let prometheus = Arc::new(PrometheusMetrics::new()?);
    let metrics: MetricsHandle = prometheus.clone();
    let shutdown = CancellationToken::new();

    // runtime operations
    let runner = Arc::new(SubprocessRunner::with_config(cfg.helm.runner_config()));
    let executor = RuntimeExecutor::new(cfg.helm.cli(), runner).with_metrics(metrics.clone());
    let batches = BatchOrchestrator::new(Arc::new(executor), cfg.batch.to_batch_config())
        .with_metrics(metrics)
        .with_shutdown(shutdown.clone());

    // pod queries
    let client = connect(cfg.kubeconfig.as_deref()).await?;
    let pods = PodQueryService::new(Arc::new(KubePodSource::new(client)));

    let adapter = RuntimeApiAdapter::new(Arc::new(batches), Arc::new(pods));
    let app = HttpApi::new(Arc::new(adapter)).router().route(
        "/metrics",
        get(move || {
            let prometheus = prometheus.clone();
            async move { render_metrics(&prometheus) }
        }),
    );

    let listener = tokio::net::TcpListener::bind(&cfg.listen).await?;
    info!(addr = %listener.local_addr()?, "http api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal(shutdown))
        .await?;

    info!("shut down");
    Ok(())
}

fn render_metrics(metrics: &PrometheusMetrics) -> Response {
    match metrics.encode_text() {
        Ok((content_type, body)) => ([(CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Resolves on ctrl-c or SIGTERM and cancels in-flight batches.
async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown requested");
    shutdown.cancel();
}
