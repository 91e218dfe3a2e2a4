#![allow(dead_code)]

use std::{
    collections::HashMap,
    ffi::OsString,
    fs::File,
    io::Write as _,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use audiosprite::{ExitInfo, LogDetails, SpriteLogger, SpriteResult, ToolOutput, ToolRunner};

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "audiosprite_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("audiosprite=debug")
        .try_init();
}

/// Create an (empty) input file; the scripted decoder decides how much PCM it yields.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, b"not really audio").unwrap();
    p
}

#[derive(Clone, Debug)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
}

impl Call {
    /// The path following `-i`.
    pub fn input(&self) -> Option<PathBuf> {
        let at = self.args.iter().position(|a| a == "-i")?;
        self.args.get(at + 1).map(PathBuf::from)
    }

    pub fn output(&self) -> Option<PathBuf> {
        self.args.last().map(PathBuf::from)
    }

    pub fn is_encode(&self) -> bool {
        self.program == "ffmpeg" && self.args.first().map(String::as_str) == Some("-y")
    }

    pub fn is_decode(&self) -> bool {
        self.program == "ffmpeg" && self.args.first().map(String::as_str) == Some("-i")
    }
}

/// Stands in for ffmpeg/afconvert.
///
/// Decoding `<name>` yields `clip_bytes[name]` bytes of PCM; encoding copies the raw input to the
/// output path so exported files exist on disk.
#[derive(Default)]
pub struct ScriptedRunner {
    pub calls: Mutex<Vec<Call>>,
    pub clip_bytes: HashMap<String, usize>,
    pub probe_fails: bool,
    pub fail_decode: Option<String>,
    pub fail_export: Option<String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clip(mut self, file_name: &str, bytes: usize) -> Self {
        self.clip_bytes.insert(file_name.to_string(), bytes);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn encodes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_encode).collect()
    }

    fn exit(code: i32) -> ToolOutput {
        ToolOutput {
            status: if code == 0 {
                ExitInfo::success()
            } else {
                ExitInfo::failed(code)
            },
            stderr: Vec::new(),
        }
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(
        &self,
        program: &str,
        args: &[OsString],
        stdout: Option<File>,
    ) -> SpriteResult<ToolOutput> {
        let call = Call {
            program: program.to_string(),
            args: args
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        };
        self.calls.lock().unwrap().push(call.clone());

        if program == "afconvert" {
            let n = call.args.len();
            std::fs::copy(&call.args[n - 2], &call.args[n - 1])?;
            return Ok(Self::exit(0));
        }

        if call.args.first().map(String::as_str) == Some("-version") {
            return Ok(Self::exit(if self.probe_fails { 1 } else { 0 }));
        }

        if call.is_decode() {
            let src = call.input().unwrap();
            let name = src.file_name().unwrap().to_string_lossy().into_owned();
            if self.fail_decode.as_deref() == Some(name.as_str()) {
                return Ok(Self::exit(1));
            }
            let bytes = self.clip_bytes.get(&name).copied().unwrap_or(0);
            let mut out = stdout.expect("decode writes to stdout");
            out.write_all(&vec![1u8; bytes])?;
            return Ok(Self::exit(0));
        }

        if call.is_encode() {
            let out = call.output().unwrap();
            let ext = out
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            if self.fail_export.as_deref() == Some(ext.as_str()) {
                return Ok(Self::exit(1));
            }
            std::fs::copy(call.input().unwrap(), &out)?;
            return Ok(Self::exit(0));
        }

        Ok(Self::exit(127))
    }
}

/// Keeps every event a build reports.
#[derive(Default)]
pub struct RecordingLogger {
    pub events: Mutex<Vec<(&'static str, String, LogDetails)>>,
}

impl RecordingLogger {
    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m, _)| m.clone())
            .collect()
    }

    pub fn find(&self, message: &str) -> Vec<LogDetails> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, m, _)| m == message)
            .map(|(_, _, d)| d.clone())
            .collect()
    }
}

impl SpriteLogger for RecordingLogger {
    fn debug(&self, message: &str, details: &LogDetails) {
        self.events
            .lock()
            .unwrap()
            .push(("debug", message.to_string(), details.clone()));
    }

    fn info(&self, message: &str, details: &LogDetails) {
        self.events
            .lock()
            .unwrap()
            .push(("info", message.to_string(), details.clone()));
    }

    fn log(&self, message: &str, details: &LogDetails) {
        self.events
            .lock()
            .unwrap()
            .push(("log", message.to_string(), details.clone()));
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
