//! Output encodings offered by the storefront's format selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested output encoding for a download.
///
/// The wire identifiers (`as_str`) are the option values of the format
/// `<select>` on an album's download page, and also feed the history
/// fingerprint, so they must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "mp3-v0")]
    Mp3V0,
    #[default]
    #[serde(rename = "mp3-320")]
    Mp3_320,
    #[serde(rename = "flac")]
    Flac,
    #[serde(rename = "aac-hi")]
    AacHi,
    #[serde(rename = "vorbis")]
    Vorbis,
    #[serde(rename = "alac")]
    Alac,
    #[serde(rename = "wave")]
    Wav,
    #[serde(rename = "aiff-lossless")]
    AiffLossless,
}

impl FileType {
    /// Every supported format, lossy first.
    pub const ALL: [FileType; 8] = [
        FileType::Mp3_320,
        FileType::Mp3V0,
        FileType::AacHi,
        FileType::Vorbis,
        FileType::Flac,
        FileType::Alac,
        FileType::Wav,
        FileType::AiffLossless,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Mp3V0 => "mp3-v0",
            FileType::Mp3_320 => "mp3-320",
            FileType::Flac => "flac",
            FileType::AacHi => "aac-hi",
            FileType::Vorbis => "vorbis",
            FileType::Alac => "alac",
            FileType::Wav => "wave",
            FileType::AiffLossless => "aiff-lossless",
        }
    }

    /// True for encodings that need long server-side preparation.
    pub fn is_lossless(self) -> bool {
        match self {
            FileType::Flac | FileType::Alac | FileType::Wav | FileType::AiffLossless => true,
            FileType::Mp3V0 | FileType::Mp3_320 | FileType::AacHi | FileType::Vorbis => false,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no supported format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown file type '{0}' (expected one of: mp3-v0, mp3-320, flac, aac-hi, vorbis, alac, wave, aiff-lossless)")]
pub struct UnknownFileType(pub String);

impl FromStr for FileType {
    type Err = UnknownFileType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FileType::ALL
            .into_iter()
            .find(|ft| ft.as_str() == wanted)
            .ok_or_else(|| UnknownFileType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_wire_identifiers() {
        assert_eq!("flac".parse::<FileType>().unwrap(), FileType::Flac);
        assert_eq!("MP3-320".parse::<FileType>().unwrap(), FileType::Mp3_320);
        assert_eq!("wave".parse::<FileType>().unwrap(), FileType::Wav);
        assert_eq!(
            " aiff-lossless ".parse::<FileType>().unwrap(),
            FileType::AiffLossless
        );
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "ogg".parse::<FileType>().unwrap_err();
        assert_eq!(err, UnknownFileType("ogg".to_string()));
    }

    #[test]
    fn display_matches_serde_name() {
        for ft in FileType::ALL {
            let json = serde_json::to_string(&ft).unwrap();
            assert_eq!(json, format!("\"{}\"", ft));
        }
    }

    #[test]
    fn lossless_split() {
        assert!(FileType::Flac.is_lossless());
        assert!(!FileType::Mp3V0.is_lossless());
    }
}
