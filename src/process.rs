use std::{
    ffi::{OsStr, OsString},
    fs::File,
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    error::{ExitInfo, SpriteResult},
    logging::{LogDetails, SpriteLogger},
};

pub const FFMPEG: &str = "ffmpeg";
pub const AFCONVERT: &str = "afconvert";

#[derive(Clone, Debug, Default)]
pub struct ToolOutput {
    pub status: ExitInfo,
    pub stderr: Vec<u8>,
}

/// Runs external tools to completion.
///
/// We shell out to the system `ffmpeg` rather than linking against FFmpeg, so every transcode is
/// one call through this trait. Tests swap in a scripted runner.
pub trait ToolRunner: Send + Sync {
    /// Run `program` with `args` and wait for it. When `stdout` is given, the child's standard
    /// output is written into it; otherwise it is discarded.
    fn run(&self, program: &str, args: &[OsString], stdout: Option<File>)
    -> SpriteResult<ToolOutput>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    fn run(
        &self,
        program: &str,
        args: &[OsString],
        stdout: Option<File>,
    ) -> SpriteResult<ToolOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null()).stderr(Stdio::piped());
        match stdout {
            Some(f) => cmd.stdout(Stdio::from(f)),
            None => cmd.stdout(Stdio::null()),
        };

        let output = cmd
            .output()
            .with_context(|| format!("failed to spawn '{program}' (is it installed and on PATH?)"))?;

        Ok(ToolOutput {
            status: output.status.into(),
            stderr: output.stderr,
        })
    }
}

/// The runner and logger a build stage spawns tools through.
#[derive(Clone, Copy)]
pub struct Tools<'a> {
    pub runner: &'a dyn ToolRunner,
    pub logger: &'a dyn SpriteLogger,
}

impl<'a> Tools<'a> {
    pub fn new(runner: &'a dyn ToolRunner, logger: &'a dyn SpriteLogger) -> Self {
        Self { runner, logger }
    }

    pub fn spawn(
        &self,
        program: &str,
        args: &[OsString],
        stdout: Option<File>,
    ) -> SpriteResult<ToolOutput> {
        self.logger
            .debug("Spawn", &LogDetails::cmd(command_line(program, args)));
        let out = self.runner.run(program, args, stdout)?;
        if !out.status.is_success() && !out.stderr.is_empty() {
            tracing::debug!(
                program,
                status = %out.status,
                stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                "tool failed"
            );
        }
        Ok(out)
    }

    /// `ffmpeg -version`; any failure to run counts as unavailable.
    pub fn ffmpeg_available(&self) -> bool {
        self.spawn(FFMPEG, &[OsString::from("-version")], None)
            .map(|out| out.status.is_success())
            .unwrap_or(false)
    }
}

pub fn command_line(program: &str, args: &[OsString]) -> String {
    std::iter::once(OsStr::new(program))
        .chain(args.iter().map(OsString::as_os_str))
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn os_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    args.into_iter().map(Into::into).collect()
}
