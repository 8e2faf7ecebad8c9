//! Audio value objects: container blobs, PCM, quantization, blocks, MP3 output

pub mod block;
pub mod container;
pub mod encoded;
pub mod encoder_state;
pub mod pcm;
pub mod quantize;

pub use block::{block_count, blocks, last_block_len, BLOCK_SIZE};
pub use container::{ContainerMimeType, RawContainerBlob};
pub use encoded::{
    human_readable_bytes, ChunkAccumulator, EncodeReport, EncodedOutput, OUTPUT_FILENAME,
};
pub use encoder_state::EncoderState;
pub use pcm::PcmBuffer;
pub use quantize::{quantize, quantize_sample, QUANT_SCALE};
