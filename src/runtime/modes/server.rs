//! Server mode
//!
//! Wires storage, the click pipeline and the link monitor together, serves
//! HTTP until a termination signal arrives, then shuts everything down in
//! order.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::api::AppState;
use crate::api::services::configure_routes;
use crate::config::AppConfig;
use crate::runtime::lifetime::{shutdown, startup};

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<AppConfig>) -> Result<()> {
    let ctx = startup::prepare_services(&config).await.map_err(|e| {
        error!("Server startup failed: {}", e);
        e
    })?;

    let pipeline = startup::start_click_pipeline(&config.analytics, &ctx.storage);
    let monitor = startup::start_monitor(&config.monitor, ctx.link_service.clone());

    let state = web::Data::new(AppState::new(
        ctx.link_service.clone(),
        config.server.base_url.clone(),
    ));
    let queue = pipeline
        .as_ref()
        .map(|p| web::Data::new(p.queue.clone()));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let workers = config.server.workers.max(1);

    info!(
        "Starting server at http://{} (backend: {}, workers: {}, code length: {}, click queue: {}, click workers: {}, monitor: {})",
        bind_address,
        ctx.storage.backend_name,
        workers,
        config.shortcode.length,
        if config.analytics.enabled {
            config.analytics.click_channel_capacity.to_string()
        } else {
            "disabled".to_string()
        },
        config.analytics.click_worker_count,
        if config.monitor.enabled {
            format!("every {} min", config.monitor.interval_minutes)
        } else {
            "disabled".to_string()
        }
    );

    let server = HttpServer::new(move || {
        let app = App::new().app_data(state.clone());
        let app = match &queue {
            Some(queue) => app.app_data(queue.clone()),
            None => app,
        };
        app.wrap(Compress::default()).configure(configure_routes)
    })
    .workers(workers)
    .shutdown_timeout(config.server.shutdown_timeout_secs)
    // 信号由我们自己处理，以保证关闭顺序
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    let handle = server.handle();
    let mut server_task = actix_web::rt::spawn(server);

    let server_handle = tokio::select! {
        res = &mut server_task => {
            match res {
                Ok(Ok(())) => warn!("HTTP server exited unexpectedly"),
                Ok(Err(e)) => error!("HTTP server error: {}", e),
                Err(e) => error!("HTTP server task failed: {}", e),
            }
            None
        }
        _ = shutdown::wait_for_signal() => Some(handle),
    };

    let report = shutdown::shutdown(
        server_handle,
        monitor,
        pipeline,
        Duration::from_secs(config.server.shutdown_timeout_secs),
    )
    .await;
    debug!("Shutdown report: {:?}", report);

    Ok(())
}
