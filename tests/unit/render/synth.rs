use super::*;
use crate::foundation::core::Rgba8;

fn red(width: u32, height: u32) -> SourceImage {
    SourceImage::solid(width, height, Rgba8::from_u32(0xff00_00ff)).unwrap()
}

#[test]
fn frame_count_and_dimensions_match_request() {
    let img = red(37, 23);
    for n in [1, 2, 8, 9] {
        let frames = synthesize(&img, n).unwrap();
        assert_eq!(frames.len(), n as usize);
        for f in &frames {
            assert_eq!((f.width, f.height), (37, 23));
            assert_eq!(f.data.len(), 37 * 23 * 4);
        }
    }
}

#[test]
fn zero_frames_is_a_validation_error() {
    let err = synthesize(&red(20, 20), 0).unwrap_err();
    assert!(matches!(err, BongoError::Validation(_)));
}

#[test]
fn size_floor_is_checked_before_synthesis() {
    assert!(synthesize(&red(10, 10), 8).is_ok());
    let err = synthesize(&red(9, 9), 8).unwrap_err();
    assert!(matches!(err, BongoError::InvalidInput(_)));
    assert!(err.to_string().contains("image too small"));
}

#[test]
fn source_is_not_mutated() {
    let img = red(50, 50);
    let before = img.rgba8().to_vec();
    let _ = synthesize(&img, 8).unwrap();
    assert_eq!(img.rgba8(), &before[..]);
}

#[test]
fn overlays_land_on_expected_pixels() {
    let img = red(200, 200);
    let palette = Palette::default();
    let frames = synthesize(&img, 8).unwrap();
    let f0 = &frames[0];

    // Left arm at (20, 80), 30x60.
    assert_eq!(f0.pixel(20, 80), Some(palette.arm.to_array()));
    assert_eq!(f0.pixel(49, 139), Some(palette.arm.to_array()));
    assert_eq!(f0.pixel(50, 80), Some([255, 0, 0, 255]));
    assert_eq!(f0.pixel(19, 80), Some([255, 0, 0, 255]));

    // Drum body and sticks.
    assert_eq!(f0.pixel(100, 140), Some(palette.drum.to_array()));
    assert_eq!(f0.pixel(83, 126), Some(palette.stick.to_array()));
    assert_eq!(f0.pixel(117, 144), Some(palette.stick.to_array()));
}

#[test]
fn parallel_matches_sequential() {
    let img = red(64, 48);
    let seq = synthesize_with(&img, &SynthOpts::default()).unwrap();
    let par = synthesize_with(
        &img,
        &SynthOpts {
            parallel: true,
            threads: Some(3),
            ..SynthOpts::default()
        },
    )
    .unwrap();
    assert_eq!(seq, par);
}

#[test]
fn zero_threads_is_rejected() {
    let opts = SynthOpts {
        parallel: true,
        threads: Some(0),
        ..SynthOpts::default()
    };
    assert!(synthesize_with(&red(20, 20), &opts).is_err());
}

#[test]
fn render_frame_matches_full_sequence() {
    let img = red(80, 60);
    let opts = SynthOpts::default();
    let all = synthesize_with(&img, &opts).unwrap();
    let third = render_frame(&img, FrameIndex(3), &opts).unwrap();
    assert_eq!(third, all[3]);
}

#[test]
fn render_frame_rejects_out_of_range_index() {
    let err = render_frame(&red(20, 20), FrameIndex(8), &SynthOpts::default()).unwrap_err();
    assert!(matches!(err, BongoError::Validation(_)));
}

#[test]
fn mismatched_kit_is_rejected() {
    let kit = DrumKit::new(
        crate::foundation::core::Canvas {
            width: 30,
            height: 30,
        },
        Palette::default(),
    );
    assert!(synthesize_frame(&red(20, 20), &kit, FrameIndex(0), 8).is_err());
}
