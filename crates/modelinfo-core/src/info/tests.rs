use super::{InvalidReason, ModelNotificationInfo, NotifTypes, NotificationInfo};
use crate::descriptor::{Descriptor, DescriptorViolation, FieldValue, field};
use proptest::prelude::*;
use std::{
    io,
    sync::{Arc, Mutex},
};

const TYPES: [&str; 1] = ["jmx.attribute.change"];

fn descriptor(entries: &[&str]) -> Descriptor {
    Descriptor::from_fields(entries).expect("well-formed entries")
}

fn record() -> ModelNotificationInfo {
    ModelNotificationInfo::new(TYPES, "MyNotif", "desc")
}

#[test]
fn default_descriptor_matches_identity() {
    let d = record().descriptor();

    let expected = descriptor(&[
        "descriptorType=notification",
        "name=MyNotif",
        "displayName=MyNotif",
        "severity=6",
    ]);
    assert_eq!(d, expected);
}

#[test]
fn with_descriptor_none_equals_new() {
    let built = ModelNotificationInfo::with_descriptor(TYPES, "MyNotif", "desc", None)
        .expect("absent descriptor selects defaults");

    assert_eq!(built, record());
}

#[test]
fn mismatched_name_is_rejected_with_name_reason() {
    let other = descriptor(&["name=Other", "descriptorType=notification"]);

    let err = ModelNotificationInfo::with_descriptor(TYPES, "MyNotif", "desc", Some(other))
        .expect_err("name mismatch must fail");

    assert_eq!(err.reason(), InvalidReason::Name);
    assert_eq!(err.reason.as_str(), "name");
    assert_eq!(err.record, "MyNotif");
    assert!(err.violation.is_none());
}

#[test]
fn wrong_descriptor_type_is_rejected() {
    let d = descriptor(&["name=MyNotif", "descriptorType=operation"]);

    let err = ModelNotificationInfo::with_descriptor(TYPES, "MyNotif", "desc", Some(d))
        .expect_err("descriptor type mismatch must fail");

    assert_eq!(err.reason(), InvalidReason::DescriptorType);
}

#[test]
fn self_invalid_descriptor_reports_violation() {
    let d = descriptor(&["name=MyNotif"]);

    let err = ModelNotificationInfo::with_descriptor(TYPES, "MyNotif", "desc", Some(d))
        .expect_err("self-invalid descriptor must fail");

    assert_eq!(err.reason(), InvalidReason::InvalidDescriptor);
    assert_eq!(
        err.violation,
        Some(DescriptorViolation::MissingField {
            field: field::DESCRIPTOR_TYPE
        })
    );
}

#[test]
fn self_check_runs_before_name_check() {
    // wrong name and illegal severity: the self-check wins
    let d = descriptor(&["name=Other", "descriptorType=notification", "severity=9"]);

    let err = record()
        .validate_descriptor(Some(&d))
        .expect_err("must fail");

    assert_eq!(err.reason(), InvalidReason::InvalidDescriptor);
}

#[test]
fn name_check_runs_before_type_check() {
    let d = descriptor(&["name=Other", "descriptorType=operation"]);

    let err = record()
        .validate_descriptor(Some(&d))
        .expect_err("must fail");

    assert_eq!(err.reason(), InvalidReason::Name);
}

#[test]
fn validate_absent_descriptor_reports_null_descriptor() {
    let err = record().validate_descriptor(None).expect_err("must fail");

    assert_eq!(err.reason(), InvalidReason::NullDescriptor);
    assert_eq!(err.reason.to_string(), "nullDescriptor");
    assert!(!record().is_valid_descriptor(None));
}

#[test]
fn supplied_fields_are_preserved_and_defaults_fill_gaps() {
    let d = descriptor(&[
        "NAME=mynotif",
        "DescriptorType=NOTIFICATION",
        "messageId=42",
    ]);

    let r = ModelNotificationInfo::with_descriptor(TYPES, "MyNotif", "desc", Some(d)).unwrap();
    let stored = r.descriptor();

    assert_eq!(stored.len(), 5);
    assert_eq!(stored.text("name"), Some("mynotif"));
    assert_eq!(stored.text("descriptorType"), Some("NOTIFICATION"));
    assert_eq!(stored.text("messageId"), Some("42"));
    assert_eq!(stored.text(field::DISPLAY_NAME), Some("MyNotif"));
    assert_eq!(stored.text(field::SEVERITY), Some("6"));
}

#[test]
fn explicit_display_name_and_severity_are_kept() {
    let d = descriptor(&[
        "name=MyNotif",
        "descriptorType=notification",
        "displayName=Shown",
        "severity=2",
    ]);

    let r = ModelNotificationInfo::with_descriptor(TYPES, "MyNotif", "desc", Some(d)).unwrap();

    assert_eq!(r.descriptor_ref().text(field::DISPLAY_NAME), Some("Shown"));
    assert_eq!(r.descriptor_ref().text(field::SEVERITY), Some("2"));
}

#[test]
fn descriptor_returns_independent_copies() {
    let r = record();

    let mut first = r.descriptor();
    let second = r.descriptor();
    assert_eq!(first, second);

    first.set_field(field::SEVERITY, "1").unwrap();
    first.set_field("extra", true).unwrap();

    assert_ne!(first, second);
    assert_eq!(second, r.descriptor());
    assert_eq!(r.descriptor_ref().text(field::SEVERITY), Some("6"));
    assert!(!r.descriptor_ref().contains("extra"));
}

#[test]
fn set_descriptor_replaces_whole_descriptor() {
    let mut r = record();
    let d = descriptor(&["name=MyNotif", "descriptorType=notification", "log=t"]);

    r.set_descriptor(Some(d)).unwrap();

    let stored = r.descriptor();
    assert_eq!(stored.field(field::LOG), Some(&FieldValue::from("t")));
    assert_eq!(stored.text(field::SEVERITY), Some("6"));

    r.set_descriptor(None).unwrap();
    assert_eq!(r, record());
}

#[test]
fn rejected_set_descriptor_leaves_state_unchanged() {
    let mut r = record();
    let before = r.descriptor();

    let err = r
        .set_descriptor(Some(descriptor(&["name=Other", "descriptorType=notification"])))
        .expect_err("must fail");

    assert_eq!(err.reason(), InvalidReason::Name);
    assert!(err.operation.contains("set_descriptor"));
    assert_eq!(r.descriptor(), before);
}

#[test]
fn clone_and_copy_construct_match_original() {
    let r = ModelNotificationInfo::with_descriptor(
        ["a.b", "c.d"],
        "MyNotif",
        "desc",
        Some(descriptor(&["name=MyNotif", "descriptorType=notification", "x=y"])),
    )
    .unwrap();

    let cloned = r.clone();
    let copied = ModelNotificationInfo::from_info(&r);

    assert_eq!(cloned.descriptor(), r.descriptor());
    assert_eq!(copied, r);
    assert_eq!(copied.notif_types().as_slice(), ["a.b", "c.d"]);
    assert_eq!(copied.description(), "desc");
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_trace(f: impl FnOnce()) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = log.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn clone_is_traced_like_copy_construct() {
    let r = record();

    let output = capture_trace(|| {
        let _cloned = r.clone();
    });

    assert!(output.contains("copying record"), "{output}");
    assert!(output.contains("MyNotif"), "{output}");
}

#[test]
fn from_parts_rejection_names_from_parts() {
    let info = NotificationInfo::new(TYPES, "MyNotif", "desc");
    let d = descriptor(&["name=Other", "descriptorType=notification"]);

    let err = ModelNotificationInfo::from_parts(info, Some(d)).unwrap_err();
    assert_eq!(err.operation, "ModelNotificationInfo::from_parts");

    let err = ModelNotificationInfo::with_descriptor(
        TYPES,
        "MyNotif",
        "",
        Some(descriptor(&["name=Other", "descriptorType=notification"])),
    )
    .unwrap_err();
    assert_eq!(err.operation, "ModelNotificationInfo::with_descriptor");
}

#[test]
fn display_renders_identity_descriptor_and_types() {
    let r = ModelNotificationInfo::new(["a.b", "c.d"], "N", "D");

    assert_eq!(
        r.to_string(),
        "ModelNotificationInfo: N ; Description: D ; Descriptor: \
         descriptorType=notification, displayName=N, name=N, severity=6 ; Types: a.b, c.d"
    );
}

#[test]
fn base_info_exposes_identity() {
    let info = NotificationInfo::new(vec!["x.y".to_string()], "n", "d");

    assert_eq!(info.notif_types(), &NotifTypes::from_vec(vec!["x.y".to_string()]));
    assert_eq!(info.name(), "n");
    assert_eq!(info.description(), "d");

    let r = ModelNotificationInfo::from_parts(info.clone(), None).unwrap();
    assert_eq!(r.info(), &info);
}

#[test]
fn notif_types_join_with_comma_space() {
    let types: NotifTypes = ["one", "two", "three"].into_iter().collect();

    assert_eq!(types.joined(), "one, two, three");
    assert_eq!(NotifTypes::new().joined(), "");
}

#[test]
fn name_match_folds_unicode_case() {
    for (record_name, descriptor_name) in [
        ("ΟΔΟΣ", "οδοσ"),
        ("ΟΔΟΣ", "οδος"),
        ("İ", "i"),
        ("Straße", "STRAßE"),
    ] {
        let entry = format!("name={descriptor_name}");
        let d = descriptor(&[entry.as_str(), "descriptorType=notification"]);

        let r = ModelNotificationInfo::with_descriptor(["t"], record_name, "", Some(d))
            .unwrap_or_else(|err| panic!("{record_name} vs {descriptor_name}: {err}"));
        assert_eq!(r.descriptor_ref().text(field::NAME), Some(descriptor_name));
    }
}

///
/// Properties
///

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_.]{0,15}"
}

fn arb_unicode_name() -> impl Strategy<Value = String> {
    "[A-Za-zÄäÖöΣσςΩωΔδİıiI]{1,12}"
}

fn arb_types() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}(\\.[a-z]{1,6}){0,3}", 0..4)
}

// flip the case of characters selected by `mask`
fn recase(s: &str, mask: &[bool]) -> String {
    s.chars()
        .zip(mask.iter().chain(std::iter::repeat(&false)))
        .map(|(c, flip)| {
            if *flip {
                if c.is_uppercase() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                }
            } else {
                c
            }
        })
        .collect()
}

// swap case of selected chars, taking the first char of any expansion
fn unicode_recase(s: &str, mask: &[bool]) -> String {
    s.chars()
        .zip(mask.iter().chain(std::iter::repeat(&false)))
        .map(|(c, flip)| match (*flip, c.is_uppercase()) {
            (false, _) => c,
            (true, true) => c.to_lowercase().next().unwrap_or(c),
            (true, false) => c.to_uppercase().next().unwrap_or(c),
        })
        .collect()
}

proptest! {
    #[test]
    fn unicode_case_variant_of_name_is_accepted(
        name in arb_unicode_name(),
        mask in prop::collection::vec(any::<bool>(), 12),
    ) {
        let variant = unicode_recase(&name, &mask);
        let d = Descriptor::new()
            .with_field(field::NAME, variant.clone())
            .unwrap()
            .with_field(field::DESCRIPTOR_TYPE, "notification")
            .unwrap();

        let r = ModelNotificationInfo::with_descriptor(["t"], name, "", Some(d));
        prop_assert!(r.is_ok(), "{:?}", r.err());
        let desc = r.unwrap().descriptor();
        prop_assert_eq!(desc.text(field::NAME), Some(variant.as_str()));
    }

    #[test]
    fn default_descriptor_for_any_identity(types in arb_types(), name in arb_name(), desc in ".{0,20}") {
        let r = ModelNotificationInfo::new(types.clone(), name.clone(), desc);
        let d = r.descriptor();

        prop_assert_eq!(d.text(field::DESCRIPTOR_TYPE), Some("notification"));
        prop_assert_eq!(d.text(field::NAME), Some(name.as_str()));
        prop_assert_eq!(d.text(field::DISPLAY_NAME), Some(name.as_str()));
        prop_assert_eq!(d.text(field::SEVERITY), Some("6"));
        prop_assert_eq!(r.notif_types().as_slice(), types.as_slice());
    }

    #[test]
    fn any_case_of_name_and_type_is_accepted(
        name in arb_name(),
        name_mask in prop::collection::vec(any::<bool>(), 16),
        type_mask in prop::collection::vec(any::<bool>(), 12),
        extra in "[a-z]{1,8}",
        extra_value in "[a-z0-9]{1,8}",
    ) {
        let mut d = Descriptor::new();
        d.set_field(field::NAME, recase(&name, &name_mask)).unwrap();
        d.set_field(field::DESCRIPTOR_TYPE, recase("notification", &type_mask)).unwrap();
        d.set_field(&format!("x{extra}"), extra_value.clone()).unwrap();

        let r = ModelNotificationInfo::with_descriptor(["t"], name.clone(), "", Some(d.clone()));
        prop_assert!(r.is_ok());

        let stored = r.unwrap().descriptor();
        prop_assert_eq!(stored.len(), d.len() + 2);
        for (field_name, value) in d.iter() {
            prop_assert_eq!(stored.field(field_name), Some(value));
        }
        prop_assert_eq!(stored.text(field::DISPLAY_NAME), Some(name.as_str()));
        prop_assert_eq!(stored.text(field::SEVERITY), Some("6"));
    }

    #[test]
    fn differing_name_is_always_rejected(name in arb_name(), other in arb_name()) {
        prop_assume!(name.to_lowercase() != other.to_lowercase());

        let d = Descriptor::new()
            .with_field(field::NAME, other)
            .unwrap()
            .with_field(field::DESCRIPTOR_TYPE, "notification")
            .unwrap();

        let mut r = ModelNotificationInfo::new(["t"], name.clone(), "");
        let built = ModelNotificationInfo::with_descriptor(["t"], name, "", Some(d.clone()));

        prop_assert_eq!(built.unwrap_err().reason(), InvalidReason::Name);
        prop_assert_eq!(r.set_descriptor(Some(d)).unwrap_err().reason(), InvalidReason::Name);
    }

    #[test]
    fn non_notification_type_is_always_rejected(name in arb_name(), ty in "[a-z]{1,12}") {
        prop_assume!(ty != "notification");

        let d = Descriptor::new()
            .with_field(field::NAME, name.clone())
            .unwrap()
            .with_field(field::DESCRIPTOR_TYPE, ty)
            .unwrap();

        let err = ModelNotificationInfo::with_descriptor(["t"], name, "", Some(d)).unwrap_err();
        prop_assert_eq!(err.reason(), InvalidReason::DescriptorType);
    }

    #[test]
    fn clone_preserves_descriptor(types in arb_types(), name in arb_name()) {
        let r = ModelNotificationInfo::new(types, name, "d");

        prop_assert_eq!(r.clone().descriptor(), r.descriptor());
    }
}
