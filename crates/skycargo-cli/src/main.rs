use anyhow::Result;
use clap::Parser;
use skycargo_cli::{run_icon, run_sounds, run_transcode, Cli, Command, IconConfig, SoundConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Icon(args) => {
            let path = run_icon(&IconConfig::from(args))?;
            tracing::info!(path = %path.display(), "icon ready");
        }
        Command::Sounds(args) => {
            let assets = run_sounds(&SoundConfig::try_from(args)?)?;
            tracing::info!(count = assets.len(), "sound files ready");
        }
        Command::Transcode { dir, ffmpeg } => {
            let summary = run_transcode(&dir, &ffmpeg)?;
            if !summary.all_converted() {
                tracing::warn!("some files could not be converted; is ffmpeg installed?");
            }
        }
        Command::All { icon, sounds } => {
            let sounds = SoundConfig::try_from(sounds)?;
            let path = run_icon(&IconConfig::from(icon))?;
            tracing::info!(path = %path.display(), "icon ready");
            let assets = run_sounds(&sounds)?;
            tracing::info!(count = assets.len(), "sound files ready");
        }
    }
    Ok(())
}
