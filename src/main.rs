use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use easel::api;
use easel::models::{AppConfig, Secrets, Session};
use easel::server;

#[derive(Parser)]
#[command(name = "easel")]
#[command(about = "Easel - image generation and editing relay server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Easel API",
        description = "Image generation and editing relay for browser survey clients",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_generate,
        api::handle_proxy,
        api::handle_edit,
        api::handle_save_final_image,
        api::handle_put_session,
        api::handle_get_session,
    ),
    components(schemas(
        api::GenerateRequest,
        api::GenerateResponse,
        api::SaveImageRequest,
        api::SaveImageResponse,
        api::SessionRequest,
        api::SessionResponse,
        Session,
    )),
    tags(
        (name = "Generation", description = "Text-to-image generation"),
        (name = "Editing", description = "Image editing and proxying"),
        (name = "Archive", description = "Final image archival"),
        (name = "Session", description = "Participant session tracking")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easel=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let config = AppConfig::load(config_file.as_deref());
    let secrets = Secrets::from_env();

    if secrets.generative_token.is_none() {
        anyhow::bail!("GENERATIVE_API_TOKEN environment variable is required");
    }
    if secrets.editing_key.is_none() {
        tracing::warn!("EDITING_API_KEY not set, editing modes will be rejected upstream");
    }

    let state = server::create_app_state(config, secrets)?;

    // Build router: shared API routes plus OpenAPI docs
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Easel server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("Easel v{VERSION} - image generation and editing relay\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR              = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:8080 (default)")
    );
    println!(
        "  CONFIG_FILE            = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  GENERATIVE_API_TOKEN   = {}",
        if std::env::var("GENERATIVE_API_TOKEN").is_ok() {
            "(set)"
        } else {
            "(not set)"
        }
    );
    println!(
        "  EDITING_API_KEY        = {}",
        if std::env::var("EDITING_API_KEY").is_ok() {
            "(set)"
        } else {
            "(not set)"
        }
    );
    println!(
        "  MEDIA_STORE_API_KEY    = {}",
        if std::env::var("MEDIA_STORE_API_KEY").is_ok() {
            "(set)"
        } else {
            "(not set)"
        }
    );
    println!(
        "  MEDIA_STORE_API_SECRET = {}",
        if std::env::var("MEDIA_STORE_API_SECRET").is_ok() {
            "(set)"
        } else {
            "(not set)"
        }
    );

    println!("\nCommands:");
    println!("  easel serve    Start the HTTP server");
    println!("\nRun 'easel --help' for more details.");
}
