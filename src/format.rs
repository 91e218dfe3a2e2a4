use std::{fmt, str::FromStr};

use crate::{config::SpriteOptions, error::SpriteError};

/// Target containers/codecs the merged track can be exported to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Aiff,
    Wav,
    Ac3,
    Mp3,
    Mp4,
    M4a,
    Ogg,
    Webm,
}

impl ExportFormat {
    /// Default export order when no list is configured.
    pub const ALL: [ExportFormat; 8] = [
        Self::Aiff,
        Self::Wav,
        Self::Ac3,
        Self::Mp3,
        Self::Mp4,
        Self::M4a,
        Self::Ogg,
        Self::Webm,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Aiff => "aiff",
            Self::Wav => "wav",
            Self::Ac3 => "ac3",
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
            Self::Webm => "webm",
        }
    }

    /// Encoder arguments placed between the raw input and the output path.
    pub fn codec_args(self, opts: &SpriteOptions) -> Vec<String> {
        let bitrate = format!("{}k", opts.bitrate);
        let owned = |args: &[&str]| args.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        match self {
            Self::Aiff | Self::Wav => Vec::new(),
            Self::Ac3 => owned(&["-acodec", "ac3", "-ab", &bitrate]),
            Self::Mp3 => {
                let mut args = owned(&["-ar", &opts.samplerate.to_string(), "-f", "mp3"]);
                if (0..=9).contains(&opts.vbr) {
                    args.extend(owned(&["-aq", &opts.vbr.to_string()]));
                } else {
                    args.extend(owned(&["-ab", &bitrate]));
                }
                args
            }
            Self::Mp4 | Self::M4a => owned(&["-ab", &bitrate]),
            Self::Ogg => owned(&["-acodec", "libvorbis", "-f", "ogg", "-ab", &bitrate]),
            Self::Webm => {
                let mut args = owned(&["-acodec", "libvorbis", "-f", "webm"]);
                if (0..=10).contains(&opts.vbr_vorbis) {
                    args.extend(owned(&["-qscale:a", &opts.vbr_vorbis.to_string()]));
                } else {
                    args.extend(owned(&["-ab", &bitrate]));
                }
                args
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExportFormat {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or_else(|| SpriteError::configuration(format!("unknown export format '{s}'")))
    }
}

/// Parse a comma-separated format list, keeping first occurrences in order.
///
/// Unknown and empty entries are skipped.
pub fn parse_format_list(list: &str) -> Vec<ExportFormat> {
    let mut out = Vec::new();
    for id in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match id.parse::<ExportFormat>() {
            Ok(f) if !out.contains(&f) => out.push(f),
            Ok(_) => {}
            Err(_) => tracing::warn!(format = id, "ignoring unknown export format"),
        }
    }
    out
}

/// Formats the merged track is exported to, in order. An empty list means every format.
pub fn export_formats(opts: &SpriteOptions) -> Vec<ExportFormat> {
    if opts.export.trim().is_empty() {
        ExportFormat::ALL.to_vec()
    } else {
        parse_format_list(&opts.export)
    }
}
