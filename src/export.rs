use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{
    config::SpriteOptions,
    error::{ExitInfo, SpriteError, SpriteResult},
    foundation::temp::TempFile,
    format::ExportFormat,
    logging::LogDetails,
    process::{AFCONVERT, FFMPEG, Tools, os_args},
};

/// `<stem>.<ext>`, without treating dots inside `stem` as an extension.
pub fn with_ext(stem: &Path, ext: &str) -> PathBuf {
    let mut s = stem.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Encode the raw PCM file `src` into `<dest_stem>.<ext>`.
///
/// Returns the path of the finished file. For `aiff` that is the `.caf` produced by the
/// afconvert post-step; the intermediate `.aiff` is removed either way.
#[tracing::instrument(skip(tools, opts, src, dest_stem), fields(format = %format))]
pub fn export_file(
    tools: Tools<'_>,
    opts: &SpriteOptions,
    src: &Path,
    dest_stem: &Path,
    format: ExportFormat,
) -> SpriteResult<PathBuf> {
    let outfile = with_ext(dest_stem, format.id());

    let mut args: Vec<OsString> = vec!["-y".into()];
    args.extend(os_args(opts.pcm_args()));
    args.push("-i".into());
    args.push(src.as_os_str().to_owned());
    args.extend(os_args(format.codec_args(opts)));
    args.push(outfile.clone().into_os_string());

    let result = tools.spawn(FFMPEG, &args, None)?;
    if !result.status.is_success() {
        return Err(SpriteError::ExportFailed {
            format: format.id().to_string(),
            status: result.status,
        });
    }

    if format == ExportFormat::Aiff {
        let aiff = TempFile::adopt(outfile);
        let caf = with_ext(dest_stem, "caf");
        convert_to_caf(tools, aiff.path(), &caf)?;
        return Ok(caf);
    }

    tools.logger.info(
        &format!("Exported {} OK", format.id()),
        &LogDetails::file(&outfile),
    );
    Ok(outfile)
}

/// `afconvert -f caff -d ima4 <src> <dest>`, only available on macOS.
pub fn convert_to_caf(tools: Tools<'_>, src: &Path, dest: &Path) -> SpriteResult<()> {
    if !cfg!(target_os = "macos") {
        tracing::warn!("caf export needs afconvert, which only ships with macOS");
        return Err(SpriteError::ExportFailed {
            format: "caf".to_string(),
            status: ExitInfo::default(),
        });
    }

    let mut args = os_args(["-f", "caff", "-d", "ima4"]);
    args.push(src.as_os_str().to_owned());
    args.push(dest.as_os_str().to_owned());

    let result = tools.spawn(AFCONVERT, &args, None)?;
    if !result.status.is_success() {
        return Err(SpriteError::ExportFailed {
            format: "caf".to_string(),
            status: result.status,
        });
    }
    tools
        .logger
        .info("Exported caf OK", &LogDetails::file(dest));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_ext_keeps_dotted_stems() {
        assert_eq!(
            with_ext(Path::new("out/v1.2/sprite_001"), "ogg"),
            PathBuf::from("out/v1.2/sprite_001.ogg")
        );
        assert_eq!(
            with_ext(Path::new("sprite"), "caf"),
            PathBuf::from("sprite.caf")
        );
    }
}
