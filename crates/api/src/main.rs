use std::net::SocketAddr;
use std::sync::Arc;

use aquasurveyor_api::config::ServerConfig;
use aquasurveyor_api::router::build_app_router;
use aquasurveyor_api::state::AppState;
use aquasurveyor_db::DbPool;
use aquasurveyor_notify::{
    EmailConfig, EmailSender, NotificationDispatcher, PgHistorySink, SmsConfig, SmsSender,
    SmtpEmailSender, TwilioSmsSender, UnconfiguredChannel,
};
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "aquasurveyor_api=debug,aquasurveyor_notify=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let pool = connect_database().await;
    let dispatcher = build_dispatcher(pool.clone());

    let addr = SocketAddr::new(
        config
            .host
            .parse()
            .unwrap_or_else(|e| panic!("HOST={:?} is not an IP address: {e}", config.host)),
        config.port,
    );
    let app = build_app_router(
        AppState {
            pool,
            config: Arc::new(config.clone()),
            dispatcher,
        },
        &config,
    );

    let listener = TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot bind {addr}: {e}"));
    tracing::info!(%addr, version = env!("CARGO_PKG_VERSION"), "AquaSurveyor API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server terminated with an error");

    tracing::info!("Shut down cleanly");
}

/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` emits JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect, ping, and migrate. Any failure aborts startup.
async fn connect_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = aquasurveyor_db::create_pool(&url)
        .await
        .expect("Failed to connect to database");
    aquasurveyor_db::health_check(&pool)
        .await
        .expect("Database did not answer the health check");
    aquasurveyor_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready");
    pool
}

/// SMTP and Twilio from the environment. A channel without configuration
/// still records its attempts, as failures.
fn build_dispatcher(pool: DbPool) -> NotificationDispatcher {
    let email: Arc<dyn EmailSender> = match EmailConfig::from_env() {
        Some(cfg) => {
            tracing::info!(host = %cfg.smtp_host, port = cfg.smtp_port, "SMTP email enabled");
            Arc::new(SmtpEmailSender::new(cfg).expect("Invalid SMTP configuration"))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, email delivery disabled");
            Arc::new(UnconfiguredChannel::new("Email"))
        }
    };

    let sms: Arc<dyn SmsSender> = match SmsConfig::from_env() {
        Some(cfg) => {
            tracing::info!(api_base = %cfg.api_base, "Twilio SMS enabled");
            Arc::new(TwilioSmsSender::new(cfg).expect("Failed to build SMS HTTP client"))
        }
        None => {
            tracing::warn!("Twilio credentials not set, SMS delivery disabled");
            Arc::new(UnconfiguredChannel::new("SMS"))
        }
    };

    NotificationDispatcher::new(email, sms, Arc::new(PgHistorySink::new(pool)))
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.expect("Failed to listen for Ctrl-C");
                tracing::info!("SIGINT received, draining connections");
            }
            _ = term.recv() => {
                tracing::info!("SIGTERM received, draining connections");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl-C");
        tracing::info!("Ctrl-C received, draining connections");
    }
}
