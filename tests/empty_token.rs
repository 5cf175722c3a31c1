mod common;

use common::Script;
use cycframe::codec::decode_json;
use cycframe::{Mapping, Shape, Value};

#[test]
fn empty_token_follows_the_declared_shape() {
    for empty in ["null", "false", "[]"] {
        assert_eq!(decode_json(empty, Shape::Boolean).unwrap(), Value::Bool(false), "{empty}");
        assert_eq!(decode_json(empty, Shape::Sequence).unwrap(), Value::Sequence(vec![]), "{empty}");
        assert_eq!(decode_json(empty, Shape::Scalar).unwrap(), Value::Null, "{empty}");
        assert_eq!(decode_json(empty, Shape::Mapping).unwrap(), Value::Mapping(Mapping::new()), "{empty}");
        assert_eq!(decode_json(empty, Shape::FrameId).unwrap(), Value::Null, "{empty}");
        assert_eq!(decode_json(empty, Shape::Any).unwrap(), Value::Null, "{empty}");
    }
}

#[test]
fn nested_empty_tokens_are_absent_markers() {
    let nested = decode_json("[1, null, false, []]", Shape::Sequence).unwrap();
    assert_eq!(
        nested,
        Value::Sequence(vec![Value::Integer(1), Value::Null, Value::Null, Value::Sequence(vec![])])
    );
}

#[test]
fn shapes_coerce_non_empty_answers() {
    assert_eq!(decode_json("\"|TRP|\"", Shape::Sequence).unwrap(), Value::Sequence(vec![Value::symbol("TRP")]));
    assert_eq!(decode_json("[\"|TRP|\"]", Shape::Scalar).unwrap(), Value::symbol("TRP"));
    assert_eq!(decode_json("[\"TRP\"]", Shape::FrameId).unwrap(), Value::symbol("TRP"));
    // generalized booleans pass through
    assert_eq!(decode_json("\"|Genes|\"", Shape::Boolean).unwrap(), Value::symbol("Genes"));
    assert!(decode_json("[1, 2]", Shape::Scalar).is_err());
    assert!(decode_json("5", Shape::Mapping).is_err());
    assert!(decode_json("5", Shape::FrameId).is_err());
}

#[test]
fn operations_decode_empty_answers_by_their_shape() {
    let script = Script::new();
    script
        .answer("(rxn-present-p", "null")
        .answer("(genes-of-reaction", "null")
        .answer("(get-slot-value", "[]")
        .answer("(chromosome-of-gene", "false");
    let db = script.database("ecoli");

    assert_eq!(db.rxn_present_p("RXN-1").unwrap(), Value::Bool(false));
    assert_eq!(db.genes_of_reaction("RXN-1").unwrap(), Value::Sequence(vec![]));
    assert_eq!(db.get_slot_value("TRP", "common-name").unwrap(), Value::Null);
    assert_eq!(db.chromosome_of_gene("EG10001").unwrap(), Value::Null);
}

#[test]
fn empty_slot_of_a_frame_is_an_empty_sequence() {
    let script = Script::new();
    script.answer("(get-slot-values 'TRP 'SYNONYMS)", "null");
    let db = script.database("ecoli");
    let trp = db.resolve("TRP").unwrap();
    assert_eq!(trp.slot("synonyms").unwrap(), Value::Sequence(vec![]));
    assert!(!trp.slot("synonyms").unwrap().truthy());
    assert_eq!(script.count_matching("'SYNONYMS"), 1);
}
