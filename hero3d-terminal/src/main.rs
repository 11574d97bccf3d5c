//! hero3d Terminal - animated hero scene
//!
//! Three floating icosahedra tumble over a ground disc while sparkles drift
//! around them.
//! Controls:
//!   - Mouse drag / WASD / Arrow Keys: Orbit the camera
//!   - Q/ESC: Quit

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hero3d_core::{Scene, SceneConfig, DEFAULT_SEED};
use hero3d_terminal::TerminalApp;

#[derive(Debug, Parser)]
#[command(name = "hero3d-terminal", version, about = "Render the hero scene in a terminal")]
struct Cli {
    /// Scene description (TOML); the built-in hero scene when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Seed for sparkle placement and drift phases
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Print the built-in scene as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", SceneConfig::default().to_toml_string()?);
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load scene from {}", path.display()))?,
        None => SceneConfig::default(),
    };
    let scene = Scene::from_config(&config, cli.seed).context("invalid scene")?;

    log::info!("starting terminal renderer at {} fps", cli.fps);
    let mut app = TerminalApp::new(scene, cli.fps)?;
    app.run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["hero3d-terminal"]);
        assert_eq!(cli.fps, 30);
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert!(cli.config.is_none());
        assert!(!cli.print_default_config);
    }

    #[test]
    fn test_cli_rejects_zero_fps() {
        assert!(Cli::try_parse_from(["hero3d-terminal", "--fps", "0"]).is_err());
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["hero3d-terminal", "-c", "scene.toml", "--seed", "9"]);
        assert_eq!(cli.config, Some(PathBuf::from("scene.toml")));
        assert_eq!(cli.seed, 9);
    }
}
