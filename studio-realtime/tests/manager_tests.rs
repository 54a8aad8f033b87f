//! Lifecycle tests for the voice session manager against mock devices and
//! a scripted live session.

use std::sync::Arc;

use bytes::Bytes;
use studio_realtime::codec::decode_base64;
use studio_realtime::mock::{MockDevices, MockRealtimeModel, MockSessionHandle};
use studio_realtime::{
    FRAME_SIZE, LiveConfig, RealtimeError, ServerEvent, SessionState, SessionStatus,
    VoiceSessionManager,
};
use studio_gemini::Modality;
use tokio::sync::oneshot;

fn setup() -> (VoiceSessionManager, MockDevices, MockSessionHandle) {
    let model = MockRealtimeModel::new();
    let session = model.handle();
    let devices = MockDevices::new();
    let manager =
        VoiceSessionManager::new(Arc::new(model), Arc::new(devices.clone()), LiveConfig::default());
    (manager, devices, session)
}

/// Half a second of 24 kHz mono silence as PCM16 bytes.
fn half_second_audio() -> ServerEvent {
    ServerEvent::AudioDelta { data: Bytes::from(vec![0u8; 24_000]), mime_type: None }
}

#[tokio::test]
async fn open_streams_with_fixed_persona() {
    let (mut manager, devices, session) = setup();
    assert_eq!(manager.state(), &SessionState::Idle);

    manager.open().await.unwrap();

    assert_eq!(manager.state(), &SessionState::Streaming);
    assert_eq!(manager.status(), SessionStatus::Listening);
    assert!(devices.microphone.is_capturing());
    assert_eq!(devices.microphone.frame_size(), FRAME_SIZE);
    assert_eq!(devices.microphone.access_requests(), 1);
    assert_eq!(devices.microphone.starts(), 1);

    let configs = session.configs();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].modalities, vec![Modality::Audio]);
    assert_eq!(configs[0].voice.as_deref(), Some("Zephyr"));
    assert_eq!(configs[0].model, "models/gemini-2.5-flash-native-audio-preview-09-2025");
}

#[tokio::test]
async fn open_while_streaming_is_rejected() {
    let (mut manager, _devices, session) = setup();
    manager.open().await.unwrap();

    let err = manager.open().await.unwrap_err();

    assert!(matches!(err, RealtimeError::AlreadyActive));
    assert_eq!(manager.state(), &SessionState::Streaming);
    assert_eq!(session.configs().len(), 1);
}

#[tokio::test]
async fn permission_denied_closes_with_error() {
    let (mut manager, devices, session) = setup();
    devices.microphone.deny_access();

    let err = manager.open().await.unwrap_err();

    assert!(matches!(err, RealtimeError::PermissionDenied(_)));
    assert!(matches!(manager.state(), SessionState::Closed { error: Some(_) }));
    assert!(matches!(manager.status(), SessionStatus::Error(_)));
    assert!(session.configs().is_empty(), "must not connect without microphone access");
    assert_eq!(devices.microphone.access_requests(), 1);
    assert_eq!(devices.microphone.starts(), 0);
    assert!(!manager.holds_resources());
    assert!(devices.sink.is_closed());
}

#[tokio::test]
async fn connect_failure_closes_with_error() {
    let (mut manager, devices, session) = setup();
    session.fail_next_connect("handshake refused");

    let err = manager.open().await.unwrap_err();

    assert!(matches!(err, RealtimeError::ConnectionError(_)));
    match manager.state() {
        SessionState::Closed { error: Some(message) } => {
            assert!(message.contains("handshake refused"))
        }
        other => panic!("unexpected state {other:?}"),
    }
    assert_eq!(devices.microphone.starts(), 0, "capture starts only once connected");
    assert!(!devices.microphone.is_capturing());
    assert!(!manager.holds_resources());
}

#[tokio::test]
async fn frames_before_streaming_are_dropped() {
    let (mut manager, _devices, session) = setup();

    manager.handle_frame(&vec![0.25; FRAME_SIZE]).await;

    assert!(session.sent_audio().is_empty());
}

#[tokio::test]
async fn streaming_frames_are_encoded_and_sent() {
    let (mut manager, _devices, session) = setup();
    manager.open().await.unwrap();

    manager.handle_frame(&vec![0.5; FRAME_SIZE]).await;

    let sent = session.sent_audio();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, "audio/pcm;rate=16000");
    let bytes = decode_base64(&sent[0].0).unwrap();
    assert_eq!(bytes.len(), FRAME_SIZE * 2);
    assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), 16384);
}

#[tokio::test]
async fn failed_send_keeps_session_open() {
    let (mut manager, _devices, session) = setup();
    manager.open().await.unwrap();
    session.fail_sends(true);

    manager.handle_frame(&vec![0.1; FRAME_SIZE]).await;

    assert_eq!(manager.state(), &SessionState::Streaming);
}

#[tokio::test]
async fn audio_is_scheduled_back_to_back() {
    let (mut manager, devices, _session) = setup();
    manager.open().await.unwrap();

    manager.handle_event(half_second_audio());
    manager.handle_event(half_second_audio());

    let scheduled = devices.sink.scheduled();
    assert_eq!(scheduled.len(), 2);
    assert_eq!(scheduled[0].1, 0.0);
    assert_eq!(scheduled[1].1, 0.5);
    assert_eq!(manager.playback_cursor(), 1.0);
    assert_eq!(manager.scheduled_chunks(), 2);
}

#[tokio::test]
async fn interruption_stops_all_playback() {
    let (mut manager, devices, _session) = setup();
    manager.open().await.unwrap();
    manager.handle_event(half_second_audio());
    manager.handle_event(half_second_audio());

    manager.handle_event(ServerEvent::Interrupted);

    assert_eq!(manager.scheduled_chunks(), 0);
    assert_eq!(manager.playback_cursor(), 0.0);
    assert_eq!(devices.sink.stopped().len(), 2);
    assert_eq!(manager.state(), &SessionState::Streaming);

    // playback resumes from the device clock
    devices.sink.set_time(2.0);
    manager.handle_event(half_second_audio());
    assert_eq!(devices.sink.scheduled().last().unwrap().1, 2.0);
}

#[tokio::test]
async fn malformed_audio_is_skipped() {
    let (mut manager, devices, _session) = setup();
    manager.open().await.unwrap();

    manager.handle_event(ServerEvent::AudioDelta { data: Bytes::from_static(&[1, 2, 3]), mime_type: None });

    assert!(devices.sink.scheduled().is_empty());
    assert_eq!(manager.state(), &SessionState::Streaming);
}

#[tokio::test]
async fn close_is_idempotent() {
    let (mut manager, devices, session) = setup();
    manager.open().await.unwrap();
    manager.handle_event(half_second_audio());

    manager.close().await;
    manager.close().await;

    assert_eq!(manager.state(), &SessionState::Idle);
    assert!(!manager.holds_resources());
    assert_eq!(manager.playback_cursor(), 0.0);
    assert_eq!(session.close_calls(), 1);
    assert_eq!(devices.microphone.stops(), 1);
    assert!(devices.sink.is_closed());
}

#[tokio::test]
async fn close_without_open_is_a_no_op() {
    let (mut manager, _devices, session) = setup();
    manager.close().await;
    assert_eq!(manager.state(), &SessionState::Idle);
    assert_eq!(session.close_calls(), 0);
}

#[tokio::test]
async fn reopen_after_close() {
    let (mut manager, devices, session) = setup();
    manager.open().await.unwrap();
    manager.close().await;

    manager.open().await.unwrap();

    assert_eq!(manager.state(), &SessionState::Streaming);
    assert_eq!(session.configs().len(), 2);
    assert_eq!(devices.microphone.access_requests(), 2);
    assert_eq!(devices.microphone.starts(), 2);
}

#[tokio::test]
async fn reopen_after_failure() {
    let (mut manager, devices, session) = setup();
    session.fail_next_connect("offline");
    assert!(manager.open().await.is_err());

    manager.open().await.unwrap();

    assert_eq!(manager.state(), &SessionState::Streaming);
    assert!(devices.microphone.is_capturing());
}

#[tokio::test]
async fn run_forwards_frames_until_shutdown() {
    let (mut manager, devices, session) = setup();
    manager.open().await.unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let driver = async {
        assert!(devices.microphone.push_frame(vec![0.0; FRAME_SIZE]));
        assert!(session.push_event(half_second_audio()));
        while session.sent_audio().is_empty() || devices.sink.scheduled().is_empty() {
            tokio::task::yield_now().await;
        }
        stop_tx.send(()).unwrap();
    };
    let shutdown = async {
        let _ = stop_rx.await;
    };

    let (result, ()) = tokio::join!(manager.run(shutdown), driver);

    result.unwrap();
    assert_eq!(manager.state(), &SessionState::Idle);
    assert!(!manager.holds_resources());
    assert_eq!(session.sent_audio().len(), 1);
}

#[tokio::test]
async fn run_ends_cleanly_when_server_closes() {
    let (mut manager, _devices, session) = setup();
    manager.open().await.unwrap();
    session.push_event(ServerEvent::TurnComplete);
    session.disconnect();

    manager.run(std::future::pending::<()>()).await.unwrap();

    assert_eq!(manager.state(), &SessionState::Closed { error: None });
    assert_eq!(manager.status(), SessionStatus::Closed);
    assert!(!manager.holds_resources());
}

#[tokio::test]
async fn run_surfaces_receive_errors() {
    let (mut manager, _devices, session) = setup();
    manager.open().await.unwrap();
    session.push_error(RealtimeError::connection("socket reset"));

    let err = manager.run(std::future::pending::<()>()).await.unwrap_err();

    assert!(matches!(err, RealtimeError::ConnectionError(_)));
    assert!(matches!(manager.state(), SessionState::Closed { error: Some(_) }));
    assert!(!manager.holds_resources());
}
