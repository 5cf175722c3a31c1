mod common;

use common::Script;
use cycframe::{CycError, Value};

const TRP: &str = r#"{
    "COMMON-NAME": ["L-tryptophan"],
    "CHEMICAL-FORMULA": [["|C|", 11], ["|H|", 12], ["|N|", 2], ["|O|", 2]],
    "COMPONENT-OF": ["|CPD-1|", "|CPD-2|", "not a frame"]
}"#;

#[test]
fn uncached_slot_costs_exactly_one_request() {
    let script = Script::new();
    script.answer("(get-slot-values 'TRP 'COMMON-NAME)", r#"["L-tryptophan"]"#);
    let db = script.database("ecoli");
    let trp = db.resolve("trp").unwrap();

    let before = script.count();
    let names = trp.slot("common-name").unwrap();
    assert_eq!(names, Value::Sequence(vec![Value::from("L-tryptophan")]));
    assert_eq!(script.count(), before + 1);
    assert_eq!(
        script.last(),
        "(with-organism (:org-id 'ECOLI) (get-slot-values 'TRP 'COMMON-NAME))"
    );

    // every spelling of the slot now hits the cache
    assert_eq!(trp.slot("COMMON-NAME").unwrap(), names);
    assert_eq!(trp.slot("|COMMON-NAME|").unwrap(), names);
    assert_eq!(trp.attr("common_name").unwrap(), names);
    assert_eq!(trp.attr("Common_Name").unwrap(), names);
    assert_eq!(script.count(), before + 1);

    // one slot does not make a loaded frame
    assert!(!trp.data_loaded().unwrap());
    assert_eq!(trp.cached_slot_count().unwrap(), 1);
}

#[test]
fn loaded_frame_answers_everything_locally() {
    let script = Script::new();
    script.answer("(get-frame-object 'TRP)", TRP);
    let db = script.database("ecoli");
    let trp = db.resolve("TRP").unwrap();
    trp.load_all().unwrap();
    assert!(trp.data_loaded().unwrap());

    let sent = script.count();
    let formula = trp.slot("chemical-formula").unwrap();
    let formula = formula.as_mapping().expect("a mapping");
    assert_eq!(formula.get("|C|"), Some(&[Value::Integer(11)][..]));
    assert_eq!(formula.get("|O|"), Some(&[Value::Integer(2)][..]));
    assert_eq!(formula.len(), 4);

    // a slot the frame does not have is absent, not fetched
    assert_eq!(trp.slot("SYNONYMS").unwrap(), Value::Null);
    assert_eq!(trp.attr("synonyms").unwrap(), Value::Null);
    assert_eq!(script.count(), sent);

    assert_eq!(
        trp.slot_names().unwrap(),
        vec!["CHEMICAL-FORMULA", "COMMON-NAME", "COMPONENT-OF"]
    );
    assert_eq!(
        trp.accessor_names().unwrap(),
        vec!["chemical_formula", "common_name", "component_of"]
    );
}

#[test]
fn references_become_frames_only_when_asked() {
    let script = Script::new();
    script.answer("(get-frame-object 'TRP)", TRP);
    let db = script.database("ecoli");
    let trp = db.resolve("TRP").unwrap();
    trp.load_all().unwrap();
    assert_eq!(db.frame_count().unwrap(), 1);

    let component_of = trp.slot("component-of").unwrap();
    assert_eq!(component_of.as_sequence().unwrap()[0], Value::symbol("CPD-1"));
    assert_eq!(db.frame_count().unwrap(), 1);

    let sent = script.count();
    let parents = trp.references("component-of").unwrap();
    assert_eq!(parents.len(), 2);
    assert_eq!(parents[0].id(), &"CPD-1");
    assert!(!parents[1].data_loaded().unwrap());
    assert_eq!(db.frame_count().unwrap(), 3);
    assert_eq!(script.count(), sent);
}

#[test]
fn engine_failure_caches_nothing() {
    let script = Script::new();
    script.answer("(get-slot-values 'TRP 'BOGUS)", r#"":error No slot BOGUS in frame TRP""#);
    let db = script.database("ecoli");
    let trp = db.resolve("TRP").unwrap();

    let err = trp.slot("bogus").unwrap_err();
    assert!(matches!(err, CycError::Engine(ref message) if message.contains("No slot BOGUS")));
    assert_eq!(trp.cached_slot_count().unwrap(), 0);

    // no negative caching either
    let sent = script.count();
    assert!(trp.slot("bogus").is_err());
    assert_eq!(script.count(), sent + 1);
}

#[test]
fn malformed_answer_leaves_frame_untouched() {
    let script = Script::new();
    script.answer("(get-frame-object 'TRP)", r#"{"COMMON-NAME": ["L-tryptophan"]"#);
    let db = script.database("ecoli");
    let trp = db.resolve("TRP").unwrap();

    assert!(matches!(trp.load_all(), Err(CycError::Decode { .. })));
    assert!(!trp.data_loaded().unwrap());
    assert_eq!(trp.cached_slot_count().unwrap(), 0);
}

#[test]
fn missing_frame_is_reported() {
    let script = Script::new();
    let db = script.database("ecoli");
    let ghost = db.resolve("GHOST").unwrap();
    assert!(matches!(ghost.load_all(), Err(CycError::MissingFrame(_))));
    assert!(!ghost.data_loaded().unwrap());
}
