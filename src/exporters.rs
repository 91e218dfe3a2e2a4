//! Manifest serializers for the supported playback libraries.
//!
//! Each strategy is a pure function of the [`Manifest`]; the output types serialize straight to
//! the JSON shape the library loads, with sprites kept in processing order.

use std::{fmt, str::FromStr};

use serde::ser::{SerializeMap as _, SerializeSeq as _};

use crate::{
    error::SpriteError,
    manifest::{Manifest, SpriteEntry},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportStrategy {
    /// The manifest itself, for jukebox-style engines.
    Jukebox,
    Howler,
    CreateJs,
}

impl ExportStrategy {
    pub const ALL: [ExportStrategy; 3] = [Self::Jukebox, Self::Howler, Self::CreateJs];

    pub fn id(self) -> &'static str {
        match self {
            Self::Jukebox => "jukebox",
            Self::Howler => "howler",
            Self::CreateJs => "createjs",
        }
    }

    pub fn serialize(self, manifest: &Manifest) -> SpriteOutput {
        match self {
            Self::Jukebox => SpriteOutput::Jukebox(manifest.clone()),
            Self::Howler => SpriteOutput::Howler(export_howler(manifest)),
            Self::CreateJs => SpriteOutput::CreateJs(export_createjs(manifest)),
        }
    }
}

impl fmt::Display for ExportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExportStrategy {
    type Err = SpriteError;

    /// Case-insensitive lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.id() == key)
            .ok_or_else(|| SpriteError::UnknownExporter(s.to_string()))
    }
}

/// Serialized result of a build.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum SpriteOutput {
    Jukebox(Manifest),
    Howler(HowlerSprite),
    CreateJs(CreateJsSprite),
}

impl SpriteOutput {
    pub fn to_json_pretty(&self) -> crate::SpriteResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SpriteError::serde(e.to_string()))
    }
}

fn ms(seconds: f64) -> f64 {
    seconds * 1000.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct HowlerSprite {
    /// Every resource, comma-joined.
    pub urls: String,
    pub sprite: HowlerSpriteMap,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HowlerSpriteMap(pub Vec<(String, HowlerRange)>);

/// Serialized as `[startMs, durationMs]`, or `[startMs, durationMs, true]` when looped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HowlerRange {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub looped: bool,
}

impl serde::Serialize for HowlerSpriteMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, range) in &self.0 {
            map.serialize_entry(name, range)?;
        }
        map.end()
    }
}

impl serde::Serialize for HowlerRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(if self.looped { 3 } else { 2 }))?;
        seq.serialize_element(&self.start_ms)?;
        seq.serialize_element(&self.duration_ms)?;
        if self.looped {
            seq.serialize_element(&true)?;
        }
        seq.end()
    }
}

pub fn export_howler(manifest: &Manifest) -> HowlerSprite {
    HowlerSprite {
        urls: manifest.resources.join(","),
        sprite: HowlerSpriteMap(
            manifest
                .spritemap
                .iter()
                .map(|(name, e)| (name.to_string(), howler_range(e)))
                .collect(),
        ),
    }
}

fn howler_range(e: &SpriteEntry) -> HowlerRange {
    HowlerRange {
        start_ms: ms(e.start),
        duration_ms: ms(e.duration()),
        looped: e.looped,
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CreateJsSprite {
    /// First resource, if any.
    pub src: Option<String>,
    pub data: CreateJsData,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CreateJsData {
    #[serde(rename = "audioSprite")]
    pub audio_sprite: Vec<CreateJsClip>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CreateJsClip {
    pub id: String,
    #[serde(rename = "startTime")]
    pub start_time: f64,
    pub duration: f64,
}

pub fn export_createjs(manifest: &Manifest) -> CreateJsSprite {
    CreateJsSprite {
        src: manifest.resources.first().cloned(),
        data: CreateJsData {
            audio_sprite: manifest
                .spritemap
                .iter()
                .map(|(name, e)| CreateJsClip {
                    id: name.to_string(),
                    start_time: ms(e.start),
                    duration: ms(e.duration()),
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Manifest {
        let mut m = Manifest {
            resources: vec!["s.ogg".into(), "s.mp3".into()],
            autoplay: Some("bgm".into()),
            ..Default::default()
        };
        m.spritemap.insert(
            "click",
            SpriteEntry {
                start: 0.0,
                end: 0.25,
                looped: false,
            },
        );
        m.spritemap.insert(
            "bgm",
            SpriteEntry {
                start: 2.0,
                end: 5.5,
                looped: true,
            },
        );
        m
    }

    #[test]
    fn strategy_lookup_is_case_insensitive() {
        assert_eq!(
            "Howler".parse::<ExportStrategy>().unwrap(),
            ExportStrategy::Howler
        );
        assert_eq!(
            "CREATEJS".parse::<ExportStrategy>().unwrap(),
            ExportStrategy::CreateJs
        );
        let err = "ogg,mp3".parse::<ExportStrategy>().unwrap_err();
        assert_eq!(err.to_string(), "No exporter for format: ogg,mp3");
    }

    #[test]
    fn howler_shape() {
        let out = ExportStrategy::Howler.serialize(&sample());
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["urls"], "s.ogg,s.mp3");
        assert_eq!(v["sprite"]["click"], serde_json::json!([0.0, 250.0]));
        assert_eq!(v["sprite"]["bgm"], serde_json::json!([2000.0, 3500.0, true]));
    }

    #[test]
    fn howler_keeps_processing_order() {
        let json = serde_json::to_string(&export_howler(&sample())).unwrap();
        let click = json.find("\"click\"").unwrap();
        let bgm = json.find("\"bgm\"").unwrap();
        assert!(click < bgm);
    }

    #[test]
    fn createjs_shape() {
        let out = export_createjs(&sample());
        assert_eq!(out.src.as_deref(), Some("s.ogg"));
        let ids: Vec<_> = out.data.audio_sprite.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["click", "bgm"]);
        assert_eq!(out.data.audio_sprite[1].start_time, 2000.0);
        assert_eq!(out.data.audio_sprite[1].duration, 3500.0);

        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["data"]["audioSprite"][0]["startTime"], 0.0);
    }

    #[test]
    fn createjs_without_resources_has_null_src() {
        let v = serde_json::to_value(export_createjs(&Manifest::default())).unwrap();
        assert!(v["src"].is_null());
    }

    #[test]
    fn jukebox_passes_manifest_through() {
        let m = sample();
        let v = serde_json::to_value(ExportStrategy::Jukebox.serialize(&m)).unwrap();
        assert_eq!(v, serde_json::to_value(&m).unwrap());
        assert_eq!(v["spritemap"]["bgm"]["loop"], true);
    }
}
