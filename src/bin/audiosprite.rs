use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use audiosprite::{SpriteBuilder, SpriteOptions};

/// Merge audio files into one audio sprite and write its JSON manifest.
#[derive(Parser, Debug)]
#[command(name = "audiosprite", version)]
struct Cli {
    /// Input audio files, in sprite order.
    files: Vec<PathBuf>,

    /// JSON options file applied on top of the defaults (flags override it).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file stem; exports are written as `<output>.<ext>`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path prefix used for resources in the manifest.
    #[arg(short = 'u', long)]
    path: Option<PathBuf>,

    /// Comma-separated export formats (aiff, wav, ac3, mp3, mp4, m4a, ogg, webm).
    #[arg(short, long)]
    export: Option<String>,

    /// Manifest format: jukebox, howler or createjs.
    #[arg(short, long)]
    format: Option<String>,

    /// Sprite to play automatically.
    #[arg(short, long)]
    autoplay: Option<String>,

    /// Sprite to loop (repeatable).
    #[arg(short, long = "loop", value_name = "NAME")]
    loop_names: Vec<String>,

    /// Leading silence in seconds.
    #[arg(short, long)]
    silence: Option<f64>,

    /// Gap between clips in seconds.
    #[arg(short, long)]
    gap: Option<f64>,

    /// Minimum sprite length in seconds.
    #[arg(short, long)]
    minlength: Option<f64>,

    /// Bitrate in kbps.
    #[arg(short, long)]
    bitrate: Option<u32>,

    /// mp3 VBR quality 0-9 (-1 disables).
    #[arg(short, long, allow_negative_numbers = true)]
    vbr: Option<i32>,

    /// webm vorbis quality 0-10 (-1 disables).
    #[arg(short = 'q', long, allow_negative_numbers = true)]
    vbr_vorbis: Option<i32>,

    /// Sample rate in Hz.
    #[arg(short = 'r', long)]
    samplerate: Option<u32>,

    /// Channel count.
    #[arg(short, long)]
    channels: Option<u16>,

    /// Comma-separated formats to also export for each clip on its own.
    #[arg(short = 'p', long)]
    rawparts: Option<String>,

    /// Log build progress at debug level.
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> anyhow::Result<SpriteOptions> {
        let mut opts = match &self.config {
            Some(path) => read_options(path)?,
            None => SpriteOptions::default(),
        };

        if let Some(v) = &self.output {
            opts.output = v.clone();
        }
        if let Some(v) = &self.path {
            opts.path = Some(v.clone());
        }
        if let Some(v) = &self.export {
            opts.export = v.clone();
        }
        if let Some(v) = &self.format {
            opts.format = v.clone();
        }
        if let Some(v) = &self.autoplay {
            opts.autoplay = Some(v.clone());
        }
        if !self.loop_names.is_empty() {
            opts.loop_names = self.loop_names.clone();
        }
        opts.silence = self.silence.unwrap_or(opts.silence);
        opts.gap = self.gap.unwrap_or(opts.gap);
        opts.minlength = self.minlength.unwrap_or(opts.minlength);
        opts.bitrate = self.bitrate.unwrap_or(opts.bitrate);
        opts.vbr = self.vbr.unwrap_or(opts.vbr);
        opts.vbr_vorbis = self.vbr_vorbis.unwrap_or(opts.vbr_vorbis);
        opts.samplerate = self.samplerate.unwrap_or(opts.samplerate);
        opts.channels = self.channels.unwrap_or(opts.channels);
        if let Some(v) = &self.rawparts {
            opts.rawparts = v.clone();
        }
        Ok(opts)
    }
}

fn read_options(path: &Path) -> anyhow::Result<SpriteOptions> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read options '{}'", path.display()))?;
    Ok(SpriteOptions::from_json(&s)?)
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "audiosprite=debug,info"
    } else {
        "audiosprite=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let opts = cli.options()?;
    let json_path = audiosprite::export::with_ext(&opts.output, "json");

    let out = SpriteBuilder::new(cli.files, opts).build()?;

    let json = out.output.to_json_pretty()?;
    std::fs::write(&json_path, json)
        .with_context(|| format!("write manifest '{}'", json_path.display()))?;

    eprintln!("wrote {}", json_path.display());
    Ok(())
}
