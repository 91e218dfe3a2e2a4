use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::SpriteOptions,
    convert::make_raw_audio_file,
    error::{SpriteError, SpriteResult},
    export::export_file,
    exporters::{ExportStrategy, SpriteOutput},
    format::{ExportFormat, export_formats, parse_format_list},
    logging::{LogDetails, SpriteLogger, TracingLogger},
    manifest::{Manifest, SpriteEntry, sprite_name},
    process::{SystemToolRunner, ToolRunner, Tools},
    track::MergedTrack,
};

/// Name of the synthetic leading-silence sprite.
pub const SILENCE_SPRITE: &str = "silence";

/// Build stages, in the order a build moves through them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStage {
    Init,
    LeadingSilence,
    ProcessingClips,
    Exporting,
    Finalizing,
    Done,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::LeadingSilence => "leading-silence",
            Self::ProcessingClips => "processing-clips",
            Self::Exporting => "exporting",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug)]
pub struct BuildOutput {
    pub manifest: Manifest,
    /// The manifest as serialized by the configured strategy.
    pub output: SpriteOutput,
    /// Total length of the merged track in seconds, padding included.
    pub track_duration: f64,
}

/// Builds one audio sprite from an ordered list of clips.
///
/// Stages run strictly one after another on the calling thread: every clip is decoded, appended
/// and padded before the next one starts, and formats are exported one at a time. The merged
/// track and its offset cursor are owned by the build and never shared.
pub struct SpriteBuilder {
    files: Vec<PathBuf>,
    opts: SpriteOptions,
    runner: Arc<dyn ToolRunner>,
    logger: Arc<dyn SpriteLogger>,
}

impl SpriteBuilder {
    pub fn new<I, P>(files: I, opts: SpriteOptions) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            opts,
            runner: Arc::new(SystemToolRunner),
            logger: Arc::new(TracingLogger),
        }
    }

    pub fn with_runner(mut self, runner: Arc<dyn ToolRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn SpriteLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run the build and hand the outcome to `on_complete`, exactly once.
    pub fn run<F>(self, on_complete: F)
    where
        F: FnOnce(SpriteResult<BuildOutput>),
    {
        on_complete(self.build());
    }

    #[tracing::instrument(skip(self), fields(files = self.files.len()))]
    pub fn build(self) -> SpriteResult<BuildOutput> {
        let mut stage = BuildStage::Init;
        let result = self.build_stages(&mut stage);
        if let Err(e) = &result {
            tracing::debug!(%stage, error = %e, "build failed");
        }
        result
    }

    fn build_stages(&self, stage: &mut BuildStage) -> SpriteResult<BuildOutput> {
        let opts = &self.opts;
        if self.files.is_empty() {
            return Err(SpriteError::NoInputFiles);
        }
        opts.validate()?;
        ensure_output_dir(&opts.output)?;

        let tools = Tools::new(self.runner.as_ref(), self.logger.as_ref());
        if !tools.ffmpeg_available() {
            return Err(SpriteError::ToolUnavailable);
        }

        let mut build = Build {
            opts,
            tools,
            track: MergedTrack::create(opts)?,
            manifest: Manifest::default(),
        };
        self.logger
            .debug("Created temporary file", &LogDetails::file(build.track.path()));

        if opts.silence > 0.0 {
            enter(stage, BuildStage::LeadingSilence);
            build.leading_silence()?;
        }

        enter(stage, BuildStage::ProcessingClips);
        let rawparts = parse_format_list(&opts.rawparts);
        for (idx, file) in self.files.iter().enumerate() {
            build
                .add_clip(idx + 1, file, &rawparts)
                .map_err(|e| SpriteError::adding_file(file, e))?;
        }

        enter(stage, BuildStage::Exporting);
        for format in export_formats(opts) {
            build
                .export_track(format)
                .map_err(|e| SpriteError::exporting(format.id(), e))?;
        }

        enter(stage, BuildStage::Finalizing);
        let out = build.finish()?;
        enter(stage, BuildStage::Done);
        Ok(out)
    }
}

fn enter(stage: &mut BuildStage, next: BuildStage) {
    tracing::debug!(from = %stage, to = %next, "build stage");
    *stage = next;
}

fn ensure_output_dir(output: &Path) -> SpriteResult<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// `<output>_<NNN>` stem for per-clip exports, 1-based.
fn part_stem(output: &Path, idx: usize) -> PathBuf {
    let mut s = output.as_os_str().to_owned();
    s.push(format!("_{idx:03}"));
    PathBuf::from(s)
}

/// State threaded through one build.
struct Build<'a> {
    opts: &'a SpriteOptions,
    tools: Tools<'a>,
    track: MergedTrack,
    manifest: Manifest,
}

impl Build<'_> {
    fn leading_silence(&mut self) -> SpriteResult<()> {
        self.manifest.spritemap.insert(
            SILENCE_SPRITE,
            SpriteEntry {
                start: 0.0,
                end: self.opts.silence,
                looped: true,
            },
        );
        if self.opts.autoplay.is_none() {
            self.manifest.autoplay = Some(SILENCE_SPRITE.to_string());
        }
        self.track
            .append_silence(self.opts.silence + self.opts.gap, self.tools.logger)
    }

    fn add_clip(
        &mut self,
        idx: usize,
        file: &Path,
        rawparts: &[ExportFormat],
    ) -> SpriteResult<()> {
        let raw = make_raw_audio_file(self.tools, self.opts, file)?;
        let name = sprite_name(file);

        let span = self
            .track
            .append_clip(raw.path(), self.opts, self.tools.logger)?;
        if span.end <= span.start {
            return Err(SpriteError::EmptyClip {
                file: file.to_path_buf(),
            });
        }
        self.manifest.spritemap.insert(
            name.clone(),
            SpriteEntry {
                start: span.start,
                end: span.end,
                looped: self.opts.is_looped(&name),
            },
        );

        for &format in rawparts {
            self.tools.logger.debug(
                "Start export slice",
                &LogDetails {
                    name: Some(name.clone()),
                    format: Some(format.id().to_string()),
                    i: Some(idx),
                    ..Default::default()
                },
            );
            export_file(
                self.tools,
                self.opts,
                raw.path(),
                &part_stem(&self.opts.output, idx),
                format,
            )?;
        }
        Ok(())
    }

    fn export_track(&mut self, format: ExportFormat) -> SpriteResult<()> {
        self.tools
            .logger
            .debug("Start export", &LogDetails::format(format.id()));
        let path = export_file(
            self.tools,
            self.opts,
            self.track.path(),
            &self.opts.output,
            format,
        )?;
        self.manifest
            .resources
            .push(path.to_string_lossy().into_owned());
        Ok(())
    }

    fn finish(self) -> SpriteResult<BuildOutput> {
        let Build {
            opts,
            track,
            mut manifest,
            ..
        } = self;

        if let Some(dest) = opts.destination() {
            for res in &mut manifest.resources {
                let base = Path::new(res.as_str())
                    .file_name()
                    .map(|b| dest.join(b))
                    .unwrap_or_else(|| dest.to_path_buf());
                *res = base.to_string_lossy().into_owned();
            }
        }
        if let Some(autoplay) = &opts.autoplay {
            manifest.autoplay = Some(autoplay.clone());
        }

        let track_duration = track.cursor();
        drop(track);

        let strategy: ExportStrategy = opts.format.parse()?;
        let output = strategy.serialize(&manifest);
        Ok(BuildOutput {
            manifest,
            output,
            track_duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_stems_are_zero_padded() {
        assert_eq!(
            part_stem(Path::new("out/sprite"), 7),
            PathBuf::from("out/sprite_007")
        );
        assert_eq!(
            part_stem(Path::new("sprite"), 1234),
            PathBuf::from("sprite_1234")
        );
    }

    #[test]
    fn empty_file_list_fails_before_anything_runs() {
        let err = SpriteBuilder::new(Vec::<PathBuf>::new(), SpriteOptions::default())
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "No input files specified.");
    }

    #[test]
    fn stage_names() {
        assert_eq!(BuildStage::ProcessingClips.to_string(), "processing-clips");
        assert_eq!(BuildStage::Done.to_string(), "done");
    }
}
