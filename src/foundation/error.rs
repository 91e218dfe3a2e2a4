use std::{fmt, path::PathBuf};

pub type SpriteResult<T> = Result<T, SpriteError>;

/// How an external process ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExitInfo {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitInfo {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            signal: None,
        }
    }

    pub fn failed(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0) && self.signal.is_none()
    }
}

impl From<std::process::ExitStatus> for ExitInfo {
    fn from(status: std::process::ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;
        Self {
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit code {code}"),
            (None, Some(signal)) => write!(f, "killed by signal {signal}"),
            (None, None) => f.write_str("unknown exit status"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SpriteError {
    #[error("No input files specified.")]
    NoInputFiles,

    #[error("No exporter for format: {0}")]
    UnknownExporter(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("ffmpeg was not found on your path")]
    ToolUnavailable,

    #[error("File does not exist: {}", .file.display())]
    SourceMissing { file: PathBuf },

    #[error("File could not be added: {} ({status})", .file.display())]
    ConversionFailed { file: PathBuf, status: ExitInfo },

    #[error("File decoded to no audio: {}", .file.display())]
    EmptyClip { file: PathBuf },

    #[error("Error exporting file: {format} ({status})")]
    ExportFailed { format: String, status: ExitInfo },

    #[error("Error adding file")]
    AddingFile {
        file: PathBuf,
        #[source]
        source: Box<SpriteError>,
    },

    #[error("Error exporting file")]
    Exporting {
        format: String,
        #[source]
        source: Box<SpriteError>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpriteError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn adding_file(file: impl Into<PathBuf>, source: SpriteError) -> Self {
        Self::AddingFile {
            file: file.into(),
            source: Box::new(source),
        }
    }

    pub fn exporting(format: impl Into<String>, source: SpriteError) -> Self {
        Self::Exporting {
            format: format.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, skipping the stage wrappers.
    pub fn root_cause(&self) -> &SpriteError {
        match self {
            Self::AddingFile { source, .. } | Self::Exporting { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_build_contract() {
        assert_eq!(
            SpriteError::NoInputFiles.to_string(),
            "No input files specified."
        );
        assert_eq!(
            SpriteError::UnknownExporter("foo".into()).to_string(),
            "No exporter for format: foo"
        );
        assert_eq!(
            SpriteError::ToolUnavailable.to_string(),
            "ffmpeg was not found on your path"
        );
        let wrapped = SpriteError::adding_file(
            "a.wav",
            SpriteError::SourceMissing {
                file: PathBuf::from("a.wav"),
            },
        );
        assert_eq!(wrapped.to_string(), "Error adding file");
    }

    #[test]
    fn root_cause_unwraps_stage_wrappers() {
        let err = SpriteError::exporting(
            "ogg",
            SpriteError::ExportFailed {
                format: "ogg".into(),
                status: ExitInfo::failed(1),
            },
        );
        assert!(matches!(
            err.root_cause(),
            SpriteError::ExportFailed { status, .. } if status.code == Some(1)
        ));
        assert!(
            err.root_cause()
                .to_string()
                .contains("Error exporting file: ogg (exit code 1)")
        );
    }

    #[test]
    fn exit_info_display() {
        assert!(ExitInfo::success().is_success());
        assert!(!ExitInfo::failed(2).is_success());
        let killed = ExitInfo {
            code: None,
            signal: Some(9),
        };
        assert!(!killed.is_success());
        assert_eq!(killed.to_string(), "killed by signal 9");
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = SpriteError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
