use serde::ser::SerializeMap as _;

/// One named range on the merged track, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpriteEntry {
    pub start: f64,
    pub end: f64,
    #[serde(rename = "loop")]
    pub looped: bool,
}

impl SpriteEntry {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Sprite entries keyed by name, iterated in insertion order.
///
/// Re-inserting an existing name replaces its entry in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpriteMap {
    entries: Vec<(String, SpriteEntry)>,
}

impl SpriteMap {
    pub fn insert(&mut self, name: impl Into<String>, entry: SpriteEntry) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((name, entry)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SpriteEntry> {
        self.entries
            .iter()
            .find_map(|(n, e)| (n == name).then_some(e))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpriteEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl serde::Serialize for SpriteMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// The build's output record.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Manifest {
    /// Exported files, in export order.
    pub resources: Vec<String>,
    pub spritemap: SpriteMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<String>,
}

/// Sprite name for an input path: the file name minus a trailing alphanumeric extension.
pub fn sprite_name(path: &std::path::Path) -> String {
    let base = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match base.rfind('.') {
        Some(dot)
            if dot + 1 < base.len()
                && base[dot + 1..].chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            base[..dot].to_string()
        }
        _ => base,
    }
}
