/// Songshelf Server - playlist manager and song downloader
use anyhow::Context;
use clap::{Parser, Subcommand};
use songshelf_fetch::YtDlpExtractor;
use songshelf_library::PlaylistStore;
use songshelf_server::{config::ServerConfig, create_router, state::AppState};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "songshelf-server")]
#[command(about = "Songshelf playlist manager and song downloader", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SONGSHELF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// List playlists in the store
    List,
    /// Copy the playlist store to a file
    Export {
        /// Destination file
        path: PathBuf,
    },
    /// Merge playlists from a JSON file into the store
    Import {
        /// JSON file holding a list of playlists
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "songshelf_server=info,songshelf_fetch=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = ServerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::List => list_playlists(&config).await?,
        Commands::Export { path } => export_playlists(&config, &path).await?,
        Commands::Import { path } => import_playlists(&config, &path).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Songshelf Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let extractor = Arc::new(YtDlpExtractor::new(config.extractor.yt_dlp()));
    let app_state = AppState::new(&config, extractor)?;

    app_state.assets.initialize().await?;
    tracing::info!(
        playlists = %config.storage.playlists_file.display(),
        songs = %config.storage.songs_dir.display(),
        lyrics = %config.storage.lyrics_dir.display(),
        images = %config.storage.images_dir.display(),
        "Asset directories ready"
    );

    let app = create_router(app_state, config.server.max_upload_bytes);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_playlists(config: &ServerConfig) -> anyhow::Result<()> {
    let store = PlaylistStore::new(config.storage.playlists_file.clone());
    let playlists = store.load().await?;

    println!("Playlists:");
    for playlist in playlists {
        println!("  {} - {} songs", playlist.name, playlist.songs.len());
    }

    Ok(())
}

async fn export_playlists(config: &ServerConfig, path: &Path) -> anyhow::Result<()> {
    let store = PlaylistStore::new(config.storage.playlists_file.clone());
    let contents = store
        .export_raw()
        .await?
        .context("No playlists to export")?;

    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Exported playlists to {}", path.display());
    Ok(())
}

async fn import_playlists(config: &ServerConfig, path: &Path) -> anyhow::Result<()> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let parsed: serde_json::Value = serde_json::from_slice(&data).context("Invalid JSON file")?;
    let serde_json::Value::Array(entries) = parsed else {
        anyhow::bail!("Invalid JSON format: expected a list of playlists");
    };

    let store = PlaylistStore::new(config.storage.playlists_file.clone());
    let imported = store.import(entries).await?;

    println!("Successfully imported {} new playlists.", imported);
    Ok(())
}
