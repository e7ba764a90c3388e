use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameConfig, GameSession, RandomPieceSource};
use ratatui_runtime::Runtime;

use crate::{command::play::app::PlayApp, util};

mod app;
mod screen;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Game configuration file (JSON)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Gravity interval in milliseconds (overrides the config file)
    #[clap(long)]
    pub(crate) drop_interval_ms: Option<u64>,
    /// Seed for the piece generator; random when omitted
    #[clap(long)]
    pub(crate) seed: Option<u64>,
    /// Print the final board snapshot as JSON when the game ends
    #[clap(long)]
    snapshot: bool,
    /// Write the final board snapshot to this file instead of stdout
    #[clap(long)]
    snapshot_out: Option<PathBuf>,
}

impl PlayArg {
    fn load_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("config", path)?,
            None => GameConfig::default(),
        };
        if let Some(drop_interval_ms) = self.drop_interval_ms {
            config.drop_interval_ms = drop_interval_ms;
        }
        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = arg.load_config()?;
    let source = match arg.seed {
        Some(seed) => RandomPieceSource::from_seed(seed),
        None => RandomPieceSource::from_os_rng(),
    };
    let session = GameSession::with_source(config, source)?;
    tracing::info!(?config, seed = ?arg.seed, "starting game");

    let mut app = PlayApp::new(session);
    Runtime::new()
        .run(&mut app)
        .context("Terminal session failed")?;

    let snapshot = app.snapshot();
    tracing::info!(
        score = snapshot.score,
        pieces = snapshot.stats.completed_pieces(),
        "game finished"
    );
    if arg.snapshot || arg.snapshot_out.is_some() {
        util::Output::save_json(&snapshot, arg.snapshot_out.clone())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_interval_override() {
        let arg = PlayArg {
            drop_interval_ms: Some(200),
            ..PlayArg::default()
        };
        let config = arg.load_config().unwrap();
        assert_eq!(config.drop_interval_ms, 200);
        assert_eq!(config.width, 10);
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let arg = PlayArg {
            drop_interval_ms: Some(0),
            ..PlayArg::default()
        };
        let err = arg.load_config().unwrap_err();
        assert!(err.to_string().contains("Invalid game configuration"));
    }
}
