//! Build event reporting.
//!
//! A build reports progress through a [`SpriteLogger`]. The default [`TracingLogger`] turns each
//! event into a `tracing` event; embedders that want the raw records can plug in their own sink.

use std::path::Path;

/// Structured fields attached to a build event. Unset fields are omitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogDetails {
    pub file: Option<String>,
    pub cmd: Option<String>,
    pub name: Option<String>,
    pub format: Option<String>,
    pub i: Option<usize>,
    pub duration: Option<f64>,
}

impl LogDetails {
    pub fn file(path: &Path) -> Self {
        Self {
            file: Some(path.display().to_string()),
            ..Default::default()
        }
    }

    pub fn cmd(cmd: impl Into<String>) -> Self {
        Self {
            cmd: Some(cmd.into()),
            ..Default::default()
        }
    }

    pub fn format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Default::default()
        }
    }

    pub fn duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }
}

pub trait SpriteLogger: Send + Sync {
    fn debug(&self, message: &str, details: &LogDetails);
    fn info(&self, message: &str, details: &LogDetails);
    fn log(&self, message: &str, details: &LogDetails);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl SpriteLogger for TracingLogger {
    fn debug(&self, message: &str, d: &LogDetails) {
        tracing::debug!(
            file = d.file.as_deref(),
            cmd = d.cmd.as_deref(),
            name = d.name.as_deref(),
            format = d.format.as_deref(),
            i = d.i,
            duration = d.duration,
            "{message}"
        );
    }

    fn info(&self, message: &str, d: &LogDetails) {
        tracing::info!(
            file = d.file.as_deref(),
            cmd = d.cmd.as_deref(),
            name = d.name.as_deref(),
            format = d.format.as_deref(),
            i = d.i,
            duration = d.duration,
            "{message}"
        );
    }

    fn log(&self, message: &str, d: &LogDetails) {
        tracing::trace!(
            file = d.file.as_deref(),
            cmd = d.cmd.as_deref(),
            name = d.name.as_deref(),
            format = d.format.as_deref(),
            i = d.i,
            duration = d.duration,
            "{message}"
        );
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl SpriteLogger for NullLogger {
    fn debug(&self, _: &str, _: &LogDetails) {}
    fn info(&self, _: &str, _: &LogDetails) {}
    fn log(&self, _: &str, _: &LogDetails) {}
}
