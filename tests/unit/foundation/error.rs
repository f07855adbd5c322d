use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BongoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BongoError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        BongoError::image_decode("x")
            .to_string()
            .contains("image decode error:")
    );
    assert!(
        BongoError::encode_io("x")
            .to_string()
            .contains("encode io error:")
    );
    assert!(
        BongoError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn dimension_mismatch_reports_both_sizes() {
    let err = BongoError::FrameDimensionMismatch {
        expected: (200, 100),
        got: (199, 100),
    };
    assert_eq!(
        err.to_string(),
        "frame dimension mismatch: expected 200x100, got 199x100"
    );
}

#[test]
fn client_errors_are_input_and_decode_only() {
    assert!(BongoError::invalid_input("small").is_client_error());
    assert!(BongoError::image_decode("garbage").is_client_error());
    assert!(!BongoError::encode_io("disk full").is_client_error());
    assert!(!BongoError::validation("quality").is_client_error());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BongoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
