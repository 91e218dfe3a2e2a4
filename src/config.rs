use std::path::{Path, PathBuf};

use crate::error::{SpriteError, SpriteResult};

/// Build configuration.
///
/// Field names follow the JSON option names so a partial JSON document can be overlaid on
/// the defaults with [`SpriteOptions::from_json`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpriteOptions {
    /// Output path without extension; every export appends `.<ext>`.
    pub output: PathBuf,
    /// Destination prefix written into `resources` instead of the local output directory.
    pub path: Option<PathBuf>,
    /// Comma-separated export formats, in export order.
    pub export: String,
    /// Manifest serializer id (`jukebox`, `howler`, `createjs`).
    pub format: String,
    pub autoplay: Option<String>,
    #[serde(rename = "loop")]
    pub loop_names: Vec<String>,
    /// Leading silence in seconds; 0 disables the `silence` sprite.
    pub silence: f64,
    /// Gap between clips in seconds.
    pub gap: f64,
    /// Minimum sprite length in seconds.
    pub minlength: f64,
    /// Bitrate in kbps.
    pub bitrate: u32,
    /// mp3 VBR quality (0-9), anything else disables.
    pub vbr: i32,
    /// vorbis quality for webm (0-10), anything else disables.
    pub vbr_vorbis: i32,
    pub samplerate: u32,
    pub channels: u16,
    /// Comma-separated formats exported per clip.
    pub rawparts: String,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output"),
            path: None,
            export: "ogg,m4a,mp3,ac3".to_string(),
            format: "jukebox".to_string(),
            autoplay: None,
            loop_names: Vec::new(),
            silence: 0.0,
            gap: 1.0,
            minlength: 0.0,
            bitrate: 128,
            vbr: -1,
            vbr_vorbis: -1,
            samplerate: 44_100,
            channels: 1,
            rawparts: String::new(),
        }
    }
}

impl SpriteOptions {
    /// Overlay a (possibly partial) JSON object on the defaults.
    pub fn from_json(json: &str) -> SpriteResult<Self> {
        serde_json::from_str(json).map_err(|e| SpriteError::serde(format!("options: {e}")))
    }

    pub fn validate(&self) -> SpriteResult<()> {
        if self.samplerate == 0 {
            return Err(SpriteError::configuration("samplerate must be non-zero"));
        }
        if self.channels == 0 {
            return Err(SpriteError::configuration("channels must be non-zero"));
        }
        if self.bitrate == 0 {
            return Err(SpriteError::configuration("bitrate must be non-zero"));
        }
        for (name, v) in [
            ("silence", self.silence),
            ("gap", self.gap),
            ("minlength", self.minlength),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SpriteError::configuration(format!(
                    "{name} must be a finite, non-negative number of seconds (got {v})"
                )));
            }
        }
        if self.output.as_os_str().is_empty() {
            return Err(SpriteError::configuration("output path must not be empty"));
        }
        Ok(())
    }

    /// Whether the sprite called `name` should loop.
    pub fn is_looped(&self, name: &str) -> bool {
        self.autoplay.as_deref() == Some(name) || self.loop_names.iter().any(|n| n == name)
    }

    pub fn destination(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// `-ar <rate> -ac <channels> -f s16le`
    pub fn pcm_args(&self) -> Vec<String> {
        vec![
            "-ar".to_string(),
            self.samplerate.to_string(),
            "-ac".to_string(),
            self.channels.to_string(),
            "-f".to_string(),
            "s16le".to_string(),
        ]
    }

    pub fn bytes_per_second(&self) -> f64 {
        f64::from(self.samplerate) * f64::from(self.channels) * 2.0
    }
}
