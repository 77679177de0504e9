use nn_chat_api::server::{
    self, ServerState, Settings,
    auth::{Credentials, CredentialsError},
};
use nn_chat_common::{
    model::user::UserName, time_display::DisplayZone, token::OneTimeTokenStore,
};
use nn_chat_db::{DbError, PostStore, client::DbClient, memory::MemoryPostStore};
use serde::Deserialize;
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Invalid display UTC offset: {0}")]
    DisplayOffset(#[from] time::error::ComponentRange),
    #[error("Error loading credentials from {0:?}: {1}")]
    Credentials(PathBuf, CredentialsError),
    #[error("Error setting up the database: {0}")]
    Database(#[from] DbError),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    server_address: IpAddr,
    server_port: u16,
    database_url: Option<String>,
    #[serde(default = "default_credentials_file")]
    credentials_file: PathBuf,
    #[serde(default = "default_assets_dir")]
    assets_dir: PathBuf,
    #[serde(default = "UserName::admin")]
    admin_user: UserName,
    #[serde(default = "default_display_utc_offset_hours")]
    display_utc_offset_hours: i8,
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("credentials")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_display_utc_offset_hours() -> i8 {
    9
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "nn_chat_api=debug,\
                nn_chat_common=debug,\
                nn_chat_db=debug,\
                tower_http=debug,axum::rejection=trace,sqlx=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

async fn connect_posts(database_url: Option<&str>) -> Result<Arc<dyn PostStore>, InitError> {
    if let Some(database_url) = database_url {
        Ok(Arc::new(DbClient::connect(database_url).await?))
    } else {
        warn!("DATABASE_URL is not set, posts are kept in memory only");
        Ok(Arc::new(MemoryPostStore::new()))
    }
}

async fn shutdown_on_ctrl_c(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal");
            shutdown.cancel();
        }
        Err(err) => error!(error = %err, "Could not listen for shutdown signal"),
    }
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let credentials = Credentials::load(&env.credentials_file)
        .await
        .map_err(|err| InitError::Credentials(env.credentials_file.clone(), err))?;
    info!(users = credentials.len(), "Loaded credentials");

    let state = ServerState {
        posts: connect_posts(env.database_url.as_deref()).await?,
        tokens: Arc::new(OneTimeTokenStore::new()),
        credentials: Arc::new(credentials),
        settings: Arc::new(Settings {
            admin: env.admin_user,
            assets_dir: env.assets_dir,
            display_zone: DisplayZone::from_whole_hours(env.display_utc_offset_hours)?,
        }),
    };
    let app = server::app(state);

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_on_ctrl_c(shutdown.clone()));

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    info!(%server_address, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.cancelled_owned())
    .await
    .map_err(InitError::TcpServe)?;

    Ok(())
}
