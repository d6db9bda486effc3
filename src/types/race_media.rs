use crate::error::{PlayerError, PlayerResult};
use gstreamer as gst;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Media for a single race: the footage plus an optional commentary track that
/// replaces the footage's own sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceMedia {
    pub race_id: String,
    pub video_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary_audio_source: Option<String>,
}

impl RaceMedia {
    pub fn new(race_id: String, video_source: String, commentary: Option<String>) -> Self {
        RaceMedia {
            race_id,
            video_source,
            commentary_audio_source: commentary,
        }
    }

    /// Commentary source, with blank strings treated as absent.
    pub fn commentary(&self) -> Option<&str> {
        self.commentary_audio_source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn has_commentary(&self) -> bool {
        self.commentary().is_some()
    }
}

/// Turns a URI or a local path into something `playbin` can open.
/// Anything containing a scheme separator is passed through untouched.
pub fn resolve_uri(source: &str) -> PlayerResult<String> {
    let source = source.trim();
    if source.is_empty() {
        return Err(PlayerError::InvalidSource("empty source".to_string()));
    }
    if source.contains("://") {
        return Ok(source.to_string());
    }
    let path = Path::new(source)
        .canonicalize()
        .map_err(|e| PlayerError::InvalidSource(format!("{}: {}", source, e)))?;
    let uri = gst::glib::filename_to_uri(&path, None)
        .map_err(|e| PlayerError::InvalidSource(format!("{}: {}", source, e)))?;
    Ok(uri.to_string())
}

/// An evening's races, played in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceCard {
    pub event_name: String,
    pub races: Vec<RaceMedia>,
}

impl RaceCard {
    pub fn single(media: RaceMedia) -> Self {
        RaceCard {
            event_name: "Race Night".to_string(),
            races: vec![media],
        }
    }

    pub fn load_from_file(path: &Path) -> PlayerResult<RaceCard> {
        let mut file = File::open(path)?;
        let mut json = String::new();
        file.read_to_string(&mut json)?;
        let card: RaceCard = serde_json::from_str(&json)?;
        if card.races.is_empty() {
            return Err(PlayerError::EmptyRaceCard);
        }
        Ok(card)
    }
}
