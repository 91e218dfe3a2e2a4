use std::{ffi::OsString, fs::File, path::Path};

use crate::{
    config::SpriteOptions,
    error::{SpriteError, SpriteResult},
    foundation::temp::TempFile,
    logging::LogDetails,
    process::{FFMPEG, Tools, os_args},
};

/// Decode `src` into a temporary raw s16le PCM file at the configured rate and channel count.
///
/// ffmpeg writes the PCM to its stdout, which is redirected straight into the temp file.
#[tracing::instrument(skip(tools, opts), fields(src = %src.display()))]
pub fn make_raw_audio_file(
    tools: Tools<'_>,
    opts: &SpriteOptions,
    src: &Path,
) -> SpriteResult<TempFile> {
    tools
        .logger
        .debug("Start processing", &LogDetails::file(src));

    if !src.exists() {
        return Err(SpriteError::SourceMissing {
            file: src.to_path_buf(),
        });
    }
    let resolved = std::path::absolute(src)?;

    let dest = TempFile::new("audiosprite");
    let out = File::create(dest.path())?;

    let mut args: Vec<OsString> = vec!["-i".into(), resolved.into_os_string()];
    args.extend(os_args(opts.pcm_args()));
    args.push("pipe:".into());

    let result = tools.spawn(FFMPEG, &args, Some(out))?;
    if !result.status.is_success() {
        return Err(SpriteError::ConversionFailed {
            file: src.to_path_buf(),
            status: result.status,
        });
    }
    Ok(dest)
}
