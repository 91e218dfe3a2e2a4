#![forbid(unsafe_code)]
//! Merge audio clips into a single audio sprite.
//!
//! A build decodes each clip to raw PCM with `ffmpeg`, appends it to one merged track padded
//! with silence so every clip starts on a whole second, exports the track to the requested
//! formats, and describes where each clip landed in a [`Manifest`]. The manifest is then
//! serialized for the configured playback library (see [`ExportStrategy`]).
//!
//! ```no_run
//! use audiosprite::{SpriteBuilder, SpriteOptions};
//!
//! let opts = SpriteOptions {
//!     export: "ogg,mp3".into(),
//!     format: "howler".into(),
//!     ..Default::default()
//! };
//! let out = SpriteBuilder::new(["boom.wav", "click.wav"], opts).build()?;
//! println!("{}", out.output.to_json_pretty()?);
//! # Ok::<(), audiosprite::SpriteError>(())
//! ```

pub mod builder;
pub mod config;
pub mod convert;
pub mod export;
pub mod exporters;
pub mod format;
pub mod foundation;
pub mod logging;
pub mod manifest;
pub mod process;
pub mod track;

pub use foundation::error;

pub use builder::{BuildOutput, BuildStage, SILENCE_SPRITE, SpriteBuilder};
pub use config::SpriteOptions;
pub use error::{ExitInfo, SpriteError, SpriteResult};
pub use exporters::{ExportStrategy, SpriteOutput};
pub use format::ExportFormat;
pub use logging::{LogDetails, NullLogger, SpriteLogger, TracingLogger};
pub use manifest::{Manifest, SpriteEntry, SpriteMap};
pub use process::{SystemToolRunner, ToolOutput, ToolRunner};
