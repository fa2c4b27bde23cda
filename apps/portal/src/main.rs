mod api_client;
mod cache;
mod config;
mod editor;
mod errors;
mod models;
mod study;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::{ApiClient, AuthToken};
use crate::cache::QueryCache;
use crate::config::Config;
use crate::models::{AssetKind, QuestionPool, UnitKind};
use crate::study::audio::MediaElement;
use crate::study::viewer::{ContentViewer, StudyDialog};

/// Stand-in for the browser's audio element when running headless.
/// Duration stays unknown because nothing is ever decoded.
#[derive(Debug, Default)]
struct DetachedAudio {
    source: Option<String>,
    position: f64,
}

impl MediaElement for DetachedAudio {
    fn load(&mut self, source: &str) {
        self.source = Some(source.to_string());
    }
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn set_muted(&mut self, _muted: bool) {}
    fn position(&self) -> f64 {
        self.position
    }
    fn set_position(&mut self, seconds: f64) {
        self.position = seconds.max(0.0);
    }
    fn duration(&self) -> f64 {
        f64::NAN
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portal v{}", env!("CARGO_PKG_VERSION"));

    let api = ApiClient::new(config.api_url.clone(), config.http_timeout)?;
    let token = match &config.api_token {
        Some(t) => AuthToken::bearer(t.clone()),
        None => {
            warn!("PORTAL_API_TOKEN not set; requests are anonymous");
            AuthToken::anonymous()
        }
    };
    let cache = QueryCache::new();
    info!("API client initialized ({})", config.api_url);

    let blocks = match cache.units(&api, &token, UnitKind::Block).await {
        Ok(blocks) => blocks,
        Err(e) => {
            warn!("Could not load blocks: {}", e.toast_message());
            return Err(e.into());
        }
    };
    info!("Loaded {} blocks", blocks.len());

    let Some(first) = blocks.first() else {
        info!("No blocks published yet");
        return Ok(());
    };

    // Blocks in the list carry summaries only; fetch the full record.
    let block = cache.unit(&api, &token, UnitKind::Block, &first.id).await?;
    let mut viewer = ContentViewer::new(block, DetachedAudio::default());
    let unit = viewer.unit();
    info!(
        "Block {} \"{}\": {} flashcards, {} sample / {} final questions, {} audios, {} presentations",
        unit.order,
        unit.title,
        unit.flashcards.len(),
        unit.questions(QuestionPool::Sample).len(),
        unit.questions(QuestionPool::Final).len(),
        unit.assets(AssetKind::Audio).len(),
        unit.assets(AssetKind::Presentation).len(),
    );
    if let Some((link, description)) = viewer.guide() {
        info!("Study guide: {link} ({description})");
    }
    if let Some(track) = viewer.playlist().current() {
        info!(
            "Audio \"{}\" at {} / {}",
            track.title,
            viewer.playlist().transport().elapsed_label(),
            viewer.playlist().transport().duration_label()
        );
    }

    viewer.open(StudyDialog::SampleTest);
    info!("Sample test opens on: {}", viewer.question_text());
    viewer.close();

    Ok(())
}
