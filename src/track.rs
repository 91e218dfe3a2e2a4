use std::{
    fs::{File, OpenOptions},
    io::Read as _,
    path::Path,
};

use crate::{
    config::SpriteOptions,
    error::SpriteResult,
    foundation::temp::TempFile,
    logging::{LogDetails, SpriteLogger},
};

/// Where a clip landed on the merged timeline, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipSpan {
    pub start: f64,
    pub end: f64,
    /// Decoded length before any minimum-length extension.
    pub original_duration: f64,
}

/// The temporary raw PCM file every clip and silence block is appended to.
///
/// `cursor` is the timeline position the next clip starts at. It only moves forward. Clips
/// advance it by their decoded length and silence by the requested duration, so it can differ
/// from the file length by the rounding of each silence block.
#[derive(Debug)]
pub struct MergedTrack {
    file: TempFile,
    cursor: f64,
    bytes_per_second: f64,
}

impl MergedTrack {
    pub fn create(opts: &SpriteOptions) -> SpriteResult<Self> {
        let file = TempFile::new("audiosprite");
        File::create(file.path())?;
        Ok(Self {
            file,
            cursor: 0.0,
            bytes_per_second: opts.bytes_per_second(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    fn duration_of(&self, bytes: u64) -> f64 {
        bytes as f64 / self.bytes_per_second
    }

    fn open_append(&self) -> SpriteResult<File> {
        Ok(OpenOptions::new().append(true).open(self.file.path())?)
    }

    /// Append `duration` seconds of zeroed samples and advance the cursor.
    pub fn append_silence(
        &mut self,
        duration: f64,
        logger: &dyn SpriteLogger,
    ) -> SpriteResult<()> {
        let len = silence_len(self.bytes_per_second, duration);
        let mut out = self.open_append()?;
        std::io::copy(&mut std::io::repeat(0).take(len), &mut out)?;
        out.sync_data()?;

        logger.info("Silence gap added", &LogDetails::duration(duration));
        self.cursor += duration;
        Ok(())
    }

    /// Append a raw PCM clip, then pad with silence so the next clip starts on a whole second
    /// plus `gap`.
    ///
    /// A clip shorter than `minlength` gets a sprite extended to `minlength`; the shortfall is
    /// written as part of the trailing silence.
    pub fn append_clip(
        &mut self,
        src: &Path,
        opts: &SpriteOptions,
        logger: &dyn SpriteLogger,
    ) -> SpriteResult<ClipSpan> {
        let mut reader = File::open(src)?;
        let mut out = self.open_append()?;
        let size = std::io::copy(&mut reader, &mut out)?;
        out.sync_data()?;
        drop(out);

        let original_duration = self.duration_of(size);
        logger.info(
            "File added OK",
            &LogDetails::file(src).with_duration(original_duration),
        );

        let extra_duration = (opts.minlength - original_duration).max(0.0);
        let duration = original_duration + extra_duration;
        let start = self.cursor;
        let span = ClipSpan {
            start,
            end: start + duration,
            original_duration,
        };

        self.cursor += original_duration;
        self.append_silence(
            extra_duration + duration.ceil() - duration + opts.gap,
            logger,
        )?;
        Ok(span)
    }
}

/// Byte length of `duration` seconds of s16le silence.
pub fn silence_len(bytes_per_second: f64, duration: f64) -> u64 {
    (bytes_per_second * duration)
        .round()
        .max(0.0) as u64
}
