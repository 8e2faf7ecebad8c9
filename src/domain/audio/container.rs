//! Recorded container blob value object

use std::fmt;
use std::path::Path;

/// Media types a recorder may tag its container output with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerMimeType {
    Webm,
    Ogg,
    Wav,
    Mp4,
    Flac,
    Mp3,
}

impl ContainerMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
            Self::Mp4 => "audio/mp4",
            Self::Flac => "audio/flac",
            Self::Mp3 => "audio/mp3",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Wav => "wav",
            Self::Mp4 => "m4a",
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
        }
    }

    /// Guess the media type from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "webm" | "mkv" => Some(Self::Webm),
            "ogg" | "oga" | "opus" => Some(Self::Ogg),
            "wav" | "wave" => Some(Self::Wav),
            "mp4" | "m4a" => Some(Self::Mp4),
            "flac" => Some(Self::Flac),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }
}

impl ContainerMimeType {
    /// Tag a file by its extension. Unknown or missing extensions fall back
    /// to the default and are left to the decoder's probe.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .unwrap_or_default()
    }
}

impl fmt::Display for ContainerMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for ContainerMimeType {
    fn default() -> Self {
        Self::Webm
    }
}

/// Encoded audio exactly as the recorder produced it, before PCM decode.
///
/// Built once per recording from the ordered capture chunks and consumed once
/// by the encode pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContainerBlob {
    data: Vec<u8>,
    mime_type: ContainerMimeType,
}

impl RawContainerBlob {
    /// Create a blob from raw bytes
    pub fn new(data: Vec<u8>, mime_type: ContainerMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Concatenate recorder chunks, in arrival order, into one blob
    pub fn from_chunks<I>(chunks: I, mime_type: ContainerMimeType) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let data = chunks.into_iter().flatten().collect();
        Self { data, mime_type }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn mime_type(&self) -> ContainerMimeType {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_as_str() {
        assert_eq!(ContainerMimeType::Webm.as_str(), "audio/webm");
        assert_eq!(ContainerMimeType::Wav.as_str(), "audio/wav");
        assert_eq!(ContainerMimeType::Mp3.as_str(), "audio/mp3");
    }

    #[test]
    fn mime_type_from_extension() {
        assert_eq!(
            ContainerMimeType::from_extension("WAV"),
            Some(ContainerMimeType::Wav)
        );
        assert_eq!(
            ContainerMimeType::from_extension("mkv"),
            Some(ContainerMimeType::Webm)
        );
        assert_eq!(ContainerMimeType::from_extension("txt"), None);
    }

    #[test]
    fn mime_type_from_path() {
        assert_eq!(
            ContainerMimeType::from_path(Path::new("take.WAV")),
            ContainerMimeType::Wav
        );
        assert_eq!(
            ContainerMimeType::from_path(Path::new("take")),
            ContainerMimeType::Webm
        );
    }

    #[test]
    fn default_mime_type_is_webm() {
        assert_eq!(ContainerMimeType::default(), ContainerMimeType::Webm);
    }

    #[test]
    fn from_chunks_keeps_arrival_order() {
        let blob = RawContainerBlob::from_chunks(
            vec![vec![1, 2], vec![], vec![3], vec![4, 5]],
            ContainerMimeType::Webm,
        );
        assert_eq!(blob.data(), &[1, 2, 3, 4, 5]);
        assert_eq!(blob.len(), 5);
    }

    #[test]
    fn from_no_chunks_is_empty() {
        let blob = RawContainerBlob::from_chunks(Vec::<Vec<u8>>::new(), ContainerMimeType::Wav);
        assert!(blob.is_empty());
        assert_eq!(blob.mime_type(), ContainerMimeType::Wav);
    }
}
