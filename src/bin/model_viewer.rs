//! Displays `assets/model.obj` once it has loaded in the background.

use anyhow::Context;
use hoverscene::{HoverApp, SceneConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::model_viewer();
    log::info!("model viewer: {}", config.model.path.display());

    HoverApp::new(config)
        .context("failed to start the model viewer")?
        .run()?;
    Ok(())
}
