//! Property tests for the PCM16 codec and the playback scheduler.

use proptest::prelude::*;
use studio_realtime::codec::{decode_audio_frame, decode_base64, encode_pcm16};
use studio_realtime::mock::MockSink;
use studio_realtime::{AudioBuffer, PlaybackScheduler};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Encoding then decoding reproduces every sample within one PCM16 step.
    #[test]
    fn prop_round_trip_within_one_step(samples in proptest::collection::vec(-1.0f32..1.0, 0..4096)) {
        let encoded = encode_pcm16(&samples);
        let bytes = decode_base64(&encoded.data).unwrap();
        let buffer = decode_audio_frame(&bytes, 16_000, 1).unwrap();

        prop_assert_eq!(buffer.frame_count(), samples.len());
        let decoded = buffer.channel(0).unwrap();
        for (original, round_tripped) in samples.iter().zip(decoded.iter()) {
            prop_assert!((original - round_tripped).abs() <= 1.0 / 32768.0);
        }
    }

    /// Encoded length is always two bytes per sample.
    #[test]
    fn prop_encoded_length(samples in proptest::collection::vec(any::<f32>(), 0..512)) {
        let bytes = decode_base64(&encode_pcm16(&samples).data).unwrap();
        prop_assert_eq!(bytes.len(), samples.len() * 2);
    }

    /// Lengths that are not whole frames are rejected.
    #[test]
    fn prop_rejects_partial_frames(len in 0usize..64, channels in 1u16..4) {
        let result = decode_audio_frame(&vec![0u8; len], 24_000, channels);
        prop_assert_eq!(result.is_ok(), len % (2 * channels as usize) == 0);
    }

    /// Each chunk starts at max(previous end, now) and never before now.
    #[test]
    fn prop_scheduler_is_gapless_and_monotonic(
        steps in proptest::collection::vec((0.0f64..0.5, 1usize..12_000), 1..20)
    ) {
        let sink = MockSink::new();
        let mut scheduler = PlaybackScheduler::new(sink.clone());
        let mut now = 0.0;
        let mut previous_end = 0.0f64;

        for (advance, frames) in steps {
            now += advance;
            sink.set_time(now);
            let chunk = scheduler.enqueue(&AudioBuffer::mono(vec![0.0; frames], 24_000)).unwrap();

            prop_assert!(chunk.start >= now);
            prop_assert_eq!(chunk.start, previous_end.max(now));
            previous_end = chunk.end();
            prop_assert_eq!(scheduler.cursor(), previous_end);
        }
    }
}
