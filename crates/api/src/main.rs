use axum::Router;
use axum::extract::DefaultBodyLimit;
use clap::Parser;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use api::routes;
use api::state::AppState;
use common::{init_logging, settings::Settings};
use repos::Repo;
use stats::clock::SystemClock;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[arg(short = 'C', long, default_value = "config")]
    config_dir: String,
}

struct UsageApp {
    settings: Arc<Settings>,
}

impl UsageApp {
    fn new(config_dir: &str) -> Result<Self, config::ConfigError> {
        Ok(Self {
            settings: Arc::new(Settings::with_config_dir(config_dir)?),
        })
    }

    async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let _log_guard = init_logging(&self.settings.logger);

        info!("Starting server on port {}", self.settings.server.port);

        let pool = self.init_db().await?;
        let state = AppState {
            repo: Repo::new(pool),
            settings: self.settings.clone(),
            clock: Arc::new(SystemClock),
        };

        let routes_all = Router::new()
            .nest("/api", routes::routes())
            .layer(DefaultBodyLimit::max(self.settings.server.max_body_size))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.settings.server.port));
        axum_server::bind(addr)
            .serve(routes_all.into_make_service())
            .await?;

        Ok(())
    }

    async fn init_db(&self) -> Result<PgPool, Box<dyn std::error::Error>> {
        let database_url = &self.settings.database.db_uri;
        let mut opts: PgConnectOptions = database_url.parse()?;
        opts = opts.log_statements(log::LevelFilter::Debug);

        let pool = PgPoolOptions::new()
            .max_connections(self.settings.database.max_connections)
            .connect_with(opts)
            .await?;

        sqlx::migrate!("../../migrations").run(&pool).await?;
        Ok(pool)
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let app = match UsageApp::new(&args.config_dir) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("Failed to load settings from {}: {}", args.config_dir, err);
            std::process::exit(1);
        }
    };

    if let Err(err) = app.run().await {
        error!("Server stopped: {}", err);
        std::process::exit(1);
    }
}
