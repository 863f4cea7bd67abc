use super::{SerializeError, SerializeErrorKind, from_cbor, to_cbor};
use crate::descriptor::Descriptor;

const LIMIT: usize = 4096;

#[test]
fn descriptor_survives_cbor() {
    let d = Descriptor::from_fields(["name=n", "descriptorType=notification", "severity=3"])
        .unwrap()
        .with_field("log", false)
        .unwrap();

    let bytes = to_cbor(&d).unwrap();
    let back: Descriptor = from_cbor(&bytes, LIMIT).unwrap();

    assert_eq!(back, d);
    assert_eq!(back.field_names().collect::<Vec<_>>(), d.field_names().collect::<Vec<_>>());
}

#[test]
fn payload_over_limit_is_rejected() {
    let bytes = to_cbor(&"0123456789".to_string()).unwrap();

    let err = from_cbor::<String>(&bytes, 4).expect_err("payload over limit must fail");

    assert_eq!(err.kind(), SerializeErrorKind::TooLarge);
    assert!(
        matches!(err, SerializeError::TooLarge { max_bytes: 4, .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn payload_at_limit_is_accepted() {
    let bytes = to_cbor(&"abc".to_string()).unwrap();

    let value: String = from_cbor(&bytes, bytes.len()).unwrap();
    assert_eq!(value, "abc");
}

#[test]
fn garbage_reports_decode_kind() {
    let err = from_cbor::<Descriptor>(&[0xff, 0x00, 0x13], LIMIT).expect_err("garbage must fail");

    assert_eq!(err.kind(), SerializeErrorKind::Decode);
    assert_eq!(err.kind().to_string(), "decode");
}

#[test]
fn case_colliding_descriptor_keys_fail_decode() {
    let mut raw = std::collections::BTreeMap::new();
    raw.insert("name", "a");
    raw.insert("NAME", "b");
    let bytes = to_cbor(&raw).unwrap();

    let err = from_cbor::<Descriptor>(&bytes, LIMIT).expect_err("duplicate keys must fail");
    assert_eq!(err.kind(), SerializeErrorKind::Decode);
}
