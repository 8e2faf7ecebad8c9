//! Encoded MP3 output value object

use super::container::ContainerMimeType;

/// File name the upload boundary receives
pub const OUTPUT_FILENAME: &str = "recording.mp3";

/// What the pipeline did to produce an [`EncodedOutput`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeReport {
    /// Sample rate of the decoded source, also the MP3 sample rate
    pub sample_rate: u32,
    /// Channels in the decoded source (only channel 0 is encoded)
    pub source_channels: usize,
    /// Samples taken from channel 0
    pub samples: usize,
    /// Number of `submit_block` calls
    pub blocks: usize,
    /// Length of the final submitted block
    pub last_block_len: Option<usize>,
}

/// Ordered chunk accumulator.
///
/// Zero-length chunks mean "no output yet" and are dropped here, so they never
/// show up in the provenance list.
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    data: Vec<u8>,
    chunk_lengths: Vec<usize>,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one encoder chunk, ignoring empty ones
    pub fn push(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        self.data.extend_from_slice(chunk);
        self.chunk_lengths.push(chunk.len());
    }

    pub fn extend<I, C>(&mut self, chunks: I)
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        for chunk in chunks {
            self.push(chunk.as_ref());
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_lengths.len()
    }

    pub fn finish(self, report: EncodeReport) -> EncodedOutput {
        EncodedOutput {
            data: self.data,
            chunk_lengths: self.chunk_lengths,
            report,
        }
    }
}

/// Compressed MP3 stream ready for preview or upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    data: Vec<u8>,
    chunk_lengths: Vec<usize>,
    report: EncodeReport,
}

impl EncodedOutput {
    /// Wrap an MP3 stream that was encoded earlier (e.g. read back from disk)
    pub fn from_mp3_bytes(data: Vec<u8>) -> Self {
        let chunk_lengths = if data.is_empty() {
            Vec::new()
        } else {
            vec![data.len()]
        };
        Self {
            data,
            chunk_lengths,
            report: EncodeReport::default(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn mime_type(&self) -> ContainerMimeType {
        ContainerMimeType::Mp3
    }

    /// Lengths of the non-empty chunks, in emission order
    pub fn chunk_lengths(&self) -> &[usize] {
        &self.chunk_lengths
    }

    pub fn report(&self) -> &EncodeReport {
        &self.report
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn human_readable_size(&self) -> String {
        human_readable_bytes(self.size_bytes())
    }
}

/// `512 B`, `1.5 KB`, `2.0 MB`
pub fn human_readable_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
