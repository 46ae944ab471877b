use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tozemoon::config::{SiteConfig, load_site_config};
use tozemoon::contact::ContactPipeline;
use tozemoon_server::{AppState, init_tracing, serve};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about = "Serve the contact submission endpoint")]
struct Cli {
    /// Site configuration (TOML or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overrides configuration and TOZEMOON_BIND
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut site = match &cli.config {
        Some(path) => load_site_config(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SiteConfig::default(),
    };
    site.contact.apply_env();
    site.server.apply_env_with(|name| std::env::var(name).ok());
    if let Some(bind) = cli.bind {
        site.server.bind = bind;
    }
    if site.contact.captcha.secret.is_empty() {
        warn!("HCAPTCHA_SECRET is not set; every verification will fail");
    }
    if site.contact.mail.api_key.is_empty() {
        warn!("RESEND_API_KEY is not set; every dispatch will fail");
    }

    let pipeline = ContactPipeline::live(&site.contact)?;
    let listener = tokio::net::TcpListener::bind(&site.server.bind)
        .await
        .with_context(|| format!("binding {}", site.server.bind))?;
    info!(addr = %listener.local_addr()?, "contact server listening");
    let state = AppState::new(pipeline, &site.server);
    serve(listener, state).await?;
    Ok(())
}
