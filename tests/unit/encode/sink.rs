use super::*;

fn frame(width: u32, height: u32, fill: u8) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: vec![fill; (width * height * 4) as usize],
    }
}

#[test]
fn stream_frames_preserves_order_and_indices() {
    let mut sink = InMemorySink::new();
    let frames = (0..5u8).map(|i| frame(4, 3, i));
    let n = stream_frames(frames, &mut sink).unwrap();

    assert_eq!(n, 5);
    assert!(sink.is_ended());
    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 4,
            height: 3
        })
    );
    for (i, (idx, f)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0 as usize, i);
        assert_eq!(f.data[0] as usize, i);
    }
}

#[test]
fn empty_sequence_is_rejected_before_begin() {
    let mut sink = InMemorySink::new();
    let err = stream_frames(Vec::<FrameRGBA>::new(), &mut sink).unwrap_err();
    assert!(matches!(err, BongoError::Validation(_)));
    assert!(sink.config().is_none());
}
