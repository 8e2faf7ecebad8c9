//! End-to-end encode pipeline tests with the real decoder and LAME

use audio_recorder::application::encode::{EncodePipeline, PipelineError};
use audio_recorder::application::ports::{ContainerDecoder, EncodeError};
use audio_recorder::domain::audio::{ContainerMimeType, RawContainerBlob, BLOCK_SIZE};
use audio_recorder::domain::config::EncoderQuality;
use audio_recorder::infrastructure::capture::write_wav;
use audio_recorder::infrastructure::{LameEncoderFactory, SymphoniaDecoder};

fn pipeline() -> EncodePipeline<SymphoniaDecoder, LameEncoderFactory> {
    EncodePipeline::new(SymphoniaDecoder::new(), LameEncoderFactory::new())
}

fn wav_blob(samples: &[f32], sample_rate: u32, channels: u16) -> RawContainerBlob {
    RawContainerBlob::new(
        write_wav(samples, sample_rate, channels).unwrap(),
        ContainerMimeType::Wav,
    )
}

fn has_frame_sync(data: &[u8]) -> bool {
    data.windows(2)
        .any(|w| w[0] == 0xFF && w[1] & 0xE0 == 0xE0)
}

#[tokio::test]
async fn one_second_of_silence_round_trips() {
    let blob = wav_blob(&vec![0.0; 44_100], 44_100, 1);

    let encoded = pipeline().encode(&blob).await.unwrap();

    let report = encoded.report();
    assert_eq!(report.sample_rate, 44_100);
    assert_eq!(report.samples, 44_100);
    assert_eq!(report.blocks, 39);
    assert_eq!(report.last_block_len, Some(44_100 - 38 * BLOCK_SIZE));
    assert!(has_frame_sync(encoded.data()));
    assert_eq!(
        encoded.chunk_lengths().iter().sum::<usize>(),
        encoded.size_bytes()
    );

    // Decode the MP3 back: still one second of near silence
    let mp3 = RawContainerBlob::new(encoded.into_data(), ContainerMimeType::Mp3);
    let pcm = SymphoniaDecoder::new().decode_container(&mp3).await.unwrap();
    assert_eq!(pcm.sample_rate(), 44_100);
    assert!(pcm.frames() >= 44_100 - BLOCK_SIZE);
    assert!(pcm.frames() <= 44_100 + 4 * BLOCK_SIZE);
    assert!(pcm.primary_channel().iter().all(|s| s.abs() < 0.01));
}

#[tokio::test]
async fn same_input_same_bytes() {
    let tone: Vec<f32> = (0..10_000)
        .map(|i| (i as f32 * 0.05).sin() * 0.5)
        .collect();
    let blob = wav_blob(&tone, 48_000, 1);
    let pipeline = pipeline().with_quality(EncoderQuality::Fast);

    let first = pipeline.encode(&blob).await.unwrap();
    let second = pipeline.encode(&blob).await.unwrap();
    assert_eq!(first.data(), second.data());
}

#[tokio::test]
async fn stereo_source_encodes_first_channel() {
    let interleaved: Vec<f32> = (0..2 * 2000)
        .map(|i| if i % 2 == 0 { 0.25 } else { -0.75 })
        .collect();
    let blob = wav_blob(&interleaved, 32_000, 2);

    let encoded = pipeline().encode(&blob).await.unwrap();
    assert_eq!(encoded.report().source_channels, 2);
    assert_eq!(encoded.report().samples, 2000);
    assert_eq!(encoded.report().blocks, 2);
}

#[tokio::test]
async fn short_clip_is_one_partial_block() {
    let blob = wav_blob(&[0.1; 100], 16_000, 1);

    let encoded = pipeline().encode(&blob).await.unwrap();
    assert_eq!(encoded.report().blocks, 1);
    assert_eq!(encoded.report().last_block_len, Some(100));
    assert!(!encoded.is_empty());
}

#[tokio::test]
async fn odd_sample_rate_fails_before_encoding() {
    let blob = wav_blob(&[0.0; 2000], 12_345, 1);

    let err = pipeline().encode(&blob).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Encode(EncodeError::Unsupported(_))
    ));
}
