use cycframe::codec::{decode_json, decode_text, encode_text};
use cycframe::{CycError, Mapping, Shape, Value};

fn read(text: &str) -> Value {
    decode_text(text, Shape::Any).unwrap()
}

#[test]
fn association_lists_become_mappings_and_back() {
    let formula = read("((H 2) (O 1))");
    let mapping = formula.as_mapping().unwrap();
    assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["|H|", "|O|"]);
    assert_eq!(encode_text(&formula), "((H 2) (O 1))");
    assert_eq!(read(&encode_text(&formula)), formula);

    // plain string keys stay strings
    let mut named = Mapping::new();
    named.insert("name", vec![Value::from("trp")]);
    named.insert("|TRP|", vec![Value::Integer(3), Value::Integer(4)]);
    let named = Value::from(named);
    assert_eq!(encode_text(&named), r#"(("name" "trp") (TRP 3 4))"#);
    assert_eq!(read(&encode_text(&named)), named);
}

#[test]
fn lists_that_are_not_associations_stay_sequences() {
    let plain = read("(1 2 3)");
    assert_eq!(plain, Value::Sequence(vec![1.into(), 2.into(), 3.into()]));
    assert_eq!(encode_text(&plain), "(1 2 3)");

    // heads that are not names
    let nested = read("((1 2) (3))");
    assert_eq!(
        nested,
        Value::Sequence(vec![
            Value::Sequence(vec![1.into(), 2.into()]),
            Value::Sequence(vec![3.into()]),
        ])
    );
    // a repeated key
    let repeated = read("((A 1) (A 2))");
    assert!(repeated.as_mapping().is_none());
    assert_eq!(repeated.as_sequence().unwrap().len(), 2);

    assert_eq!(read("#(1 2)"), read("(1 2)"));
    assert_eq!(read("'(A B)"), Value::Sequence(vec![Value::symbol("A"), Value::symbol("B")]));
    assert_eq!(read("(1 ; two is next\n 2)"), read("(1 2)"));
}

#[test]
fn symbols_keep_their_spelling() {
    assert_eq!(read("trp"), Value::symbol("TRP"));
    assert_eq!(read("|Genes|"), Value::symbol("Genes"));
    assert_eq!(encode_text(&Value::symbol("Genes")), "|Genes|");
    assert_eq!(encode_text(&Value::symbol("RXN-9000")), "RXN-9000");

    // symbols the reader would take for something else
    assert_eq!(encode_text(&Value::symbol("NIL")), "|NIL|");
    assert_eq!(encode_text(&Value::symbol("T")), "|T|");
    assert_eq!(encode_text(&Value::symbol("123")), "|123|");
    assert_eq!(read("|NIL|"), Value::symbol("NIL"));
    assert_eq!(read("|123|"), Value::symbol("123"));

    // a delimiter-wrapped string is sent as the symbol it spells
    assert_eq!(encode_text(&Value::from("|TRP|")), "TRP");
}

#[test]
fn delimited_text_converts_to_the_symbol_it_spells() {
    assert_eq!(Value::from("|TRP|"), Value::symbol("TRP"));
    assert_eq!(Value::from(String::from("|Genes|")), Value::symbol("Genes"));
    assert_eq!(Value::from("TRP"), Value::String("TRP".to_owned()));
    assert_eq!(Value::from("| spaced |"), Value::String("| spaced |".to_owned()));

    let compounds = Value::from(vec![Value::from("|CPD-1|"), Value::from("x")]);
    assert_eq!(encode_text(&compounds), r#"(CPD-1 "x")"#);
    assert_eq!(read(&encode_text(&compounds)), compounds);
}

#[test]
fn strings_are_escaped() {
    let text = Value::from(r#"say "hi" \ bye"#);
    assert_eq!(encode_text(&text), r#""say \"hi\" \\ bye""#);
    assert_eq!(read(&encode_text(&text)), text);
}

#[test]
fn pairs_travel_as_dotted_lists() {
    let pair = Value::pair(1, 2);
    assert_eq!(encode_text(&pair), "(1 . 2)");
    assert_eq!(read("(1 . 2)"), pair);

    let half = Value::half_pair(5);
    assert_eq!(encode_text(&half), "(nil . 5)");
    assert_eq!(read("(nil . 5)"), half);

    let nested = Value::pair(1, Value::pair(2, 3));
    assert_eq!(encode_text(&nested), "(1 . (2 . 3))");
    assert_eq!(read("(1 . (2 . 3))"), nested);
    assert_eq!(read("(1 2 . 3)"), nested);
}

#[test]
fn numbers_and_tokens() {
    assert_eq!(read("-3"), Value::Integer(-3));
    assert_eq!(read("2.5"), Value::Float(2.5));
    assert_eq!(read("1/4"), Value::Float(0.25));
    assert_eq!(read("1.0d0"), Value::Float(1.0));
    assert_eq!(read("3e2"), Value::Float(300.0));
    assert_eq!(encode_text(&Value::Float(2.5)), "2.5");
    assert_eq!(encode_text(&Value::Float(1.0)), "1.0");

    assert_eq!(read("t"), Value::Bool(true));
    assert_eq!(read("nil"), Value::Null);
    assert_eq!(encode_text(&Value::Bool(true)), "t");
    assert_eq!(encode_text(&Value::Bool(false)), "nil");
    assert_eq!(encode_text(&Value::Null), "nil");

    assert_eq!(read(":all"), Value::Keyword("all".into()));
    assert_eq!(encode_text(&Value::keyword(":include_super")), ":include-super");
}

#[test]
fn json_answers_decode_like_engine_text() {
    let object = decode_json(r#"{"A": 1, "B": [2, 3]}"#, Shape::Any).unwrap();
    let object = object.as_mapping().unwrap();
    assert_eq!(object.get("A"), Some(&[Value::Integer(1)][..]));
    assert_eq!(object.get("B"), Some(&[Value::Integer(2), Value::Integer(3)][..]));

    assert_eq!(
        decode_json(r#"[["|H|", 2], ["|O|", 1]]"#, Shape::Any).unwrap(),
        read("((H 2) (O 1))")
    );
    assert_eq!(decode_json("2.5", Shape::Scalar).unwrap(), Value::Float(2.5));
}

#[test]
fn malformed_input_is_a_decode_error() {
    for text in ["(1 2", ")", "\"open", ""] {
        assert!(
            matches!(decode_text(text, Shape::Any), Err(CycError::Decode { .. })),
            "{text:?} should not decode"
        );
    }
    assert!(matches!(decode_text("1/0", Shape::Any), Err(CycError::Decode { .. })));
    assert!(matches!(decode_json("[1,", Shape::Any), Err(CycError::Decode { .. })));
}
