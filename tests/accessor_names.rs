mod common;

use std::sync::Arc;

use common::Script;
use cycframe::ident::{canonical_key, engine_name, is_accessor_name, to_accessor_name, to_canonical_id};
use cycframe::{CycError, FrameId, Value};

#[test]
fn engine_names_translate_to_accessors() {
    assert_eq!(to_accessor_name("RXN-9000").as_deref(), Some("rxn_9000"));
    assert_eq!(to_accessor_name("|COMMON-NAME|").as_deref(), Some("common_name"));
    assert_eq!(to_accessor_name("Genes").as_deref(), Some("genes"));
    // only reachable through indexed lookup
    assert_eq!(to_accessor_name("N+1-NAME"), None);
    assert_eq!(to_accessor_name("2-OXOGLUTARATE"), None);
    assert_eq!(to_accessor_name("CPD 1"), None);

    assert!(is_accessor_name("common_name"));
    assert!(is_accessor_name("_private"));
    assert!(!is_accessor_name("common-name"));
    assert!(!is_accessor_name("9lives"));
}

#[test]
fn every_spelling_has_one_canonical_form() {
    for spelling in ["RXN-9000", "rxn_9000", "|RXN-9000|", "Rxn-9000", "  rxn-9000\t"] {
        assert_eq!(canonical_key(spelling), "RXN-9000", "{spelling:?}");
        assert_eq!(to_canonical_id(spelling), "|RXN-9000|", "{spelling:?}");
    }
    // delimited spellings are sent verbatim
    assert_eq!(engine_name("|Genes|"), "Genes");
    assert_eq!(engine_name("genes"), "GENES");
    assert_eq!(FrameId::new("|Genes|"), FrameId::new("GENES"));
    assert_eq!(FrameId::new("|Genes|").name(), "Genes");
    assert_eq!(FrameId::new("|Genes|").to_string(), "|Genes|");
    assert_eq!(FrameId::from_symbol("EG10001").accessor_name().as_deref(), Some("eg10001"));
}

#[test]
fn odd_slot_names_are_reached_by_index_only() {
    let script = Script::new();
    script.answer(
        "(get-frame-object 'CPD-7)",
        r#"{"N+1-NAME": ["next"], "COMMON-NAME": ["seven"]}"#,
    );
    let db = script.database("ecoli");
    let cpd = db.resolve("cpd_7").unwrap();
    cpd.load_all().unwrap();

    assert_eq!(cpd.slot("N+1-NAME").unwrap(), Value::Sequence(vec![Value::from("next")]));
    assert_eq!(cpd.slot("|N+1-NAME|").unwrap(), Value::Sequence(vec![Value::from("next")]));
    assert!(matches!(cpd.attr("n+1_name"), Err(CycError::InvalidAccessor(_))));
    assert_eq!(cpd.accessor_names().unwrap(), vec!["common_name"]);
    assert_eq!(cpd.accessor_of("common-name").unwrap().as_deref(), Some("common_name"));
    assert_eq!(cpd.accessor_of("N+1-NAME").unwrap(), None);
    assert_eq!(cpd.slot_names().unwrap(), vec!["COMMON-NAME", "N+1-NAME"]);
}

#[test]
fn frames_with_accessor_safe_ids_compare_to_any_spelling() {
    let script = Script::new();
    let db = script.database("ecoli");
    let frame = db.resolve("|RXN-9000|").unwrap();
    assert!(*frame == *"rxn_9000");
    assert_eq!(frame.id().accessor_name().as_deref(), Some("rxn_9000"));
    assert_eq!(frame.id(), &"Rxn-9000");
}

#[test]
fn underscores_survive_only_when_delimited() {
    assert_eq!(engine_name("|MY_ID|"), "MY_ID");
    assert_eq!(engine_name("my_id"), "MY-ID");
    assert_eq!(engine_name("MY_ID"), "MY-ID");
    assert_ne!(FrameId::new("|MY_ID|"), FrameId::new("my_id"));

    let script = Script::new();
    script.answer("(get-slot-values 'MY_ID 'COMMON-NAME)", r#"["underscored"]"#);
    let db = script.database("ecoli");
    let frame = db.resolve("|MY_ID|").unwrap();
    assert_eq!(
        frame.slot("common-name").unwrap(),
        Value::Sequence(vec![Value::from("underscored")])
    );
    assert!(script.last().contains("'MY_ID 'COMMON-NAME"));
    assert!(!Arc::ptr_eq(&frame, &db.resolve("my_id").unwrap()));
}
