use shunt::{default_environment, Environment, Value};

fn evaluate_with_constants(source: &str, constants: &[(&str, Value)]) -> Value {
    let mut env = default_environment();
    for (name, value) in constants {
        env.define_constant(*name, value.clone());
    }
    env.evaluate(source)
        .unwrap_or_else(|e| panic!("{:?} failed: {}", source, e))
}

#[test]
fn test_arithmetic_with_constants() {
    let cases: Vec<(&str, Vec<(&str, Value)>, Value)> = vec![
        ("a+b", vec![("a", 4.into()), ("b", 3.into())], 7.into()),
        ("-a", vec![("a", 1.into())], (-1).into()),
        ("a-b", vec![("a", 4.into()), ("b", 3.into())], 1.into()),
        ("a-b", vec![("a", 3.into()), ("b", 4.into())], (-1).into()),
        ("cc*dr", vec![("cc", 3.into()), ("dr", 4.into())], 12.into()),
        ("cc/dr", vec![("cc", 3.into()), ("dr", 4.into())], 0.75.into()),
        ("cc^dr", vec![("cc", 3.into()), ("dr", 4.into())], 81.into()),
        (
            "a+b-c^d",
            vec![("a", 1.into()), ("b", 3.into()), ("c", 8.into()), ("d", 4.into())],
            (1.0 + 3.0 - 8f64.powi(4)).into(),
        ),
        (
            "2(a+b)^c",
            vec![("a", 3.into()), ("b", 1.into()), ("c", (-2).into())],
            0.125.into(),
        ),
    ];
    for (source, constants, expected) in cases {
        assert_eq!(
            evaluate_with_constants(source, &constants),
            expected,
            "for {:?}",
            source
        );
    }
}

#[test]
fn test_explicit_names_and_text_constants() {
    let cases: Vec<(&str, Vec<(&str, Value)>, Value)> = vec![
        ("a+${b}", vec![("a", "4".into()), ("b", "3".into())], 7.into()),
        ("-${a}", vec![("a", "1".into())], (-1).into()),
        ("${a}-b.c", vec![("a", "4".into()), ("b.c", "7".into())], (-3).into()),
        ("${a} ${b}", vec![("a", 4.into()), ("b", 3.into())], 7.into()),
        (
            "${a} ${b.c}",
            vec![("a", "hello".into()), ("b.c", "my honey".into())],
            "hellomy honey".into(),
        ),
        (
            r#"${a} || " " || b.c"#,
            vec![("a", "hello".into()), ("b.c", "my honey".into())],
            "hello my honey".into(),
        ),
        (
            "${hello my honey}*${hello my darling!}",
            vec![("hello my honey", 4.into()), ("hello my darling!", 3.into())],
            12.into(),
        ),
        ("手紙+${123}", vec![("手紙", 3.into()), ("123", 4.into())], 7.into()),
        (
            "(手紙)(${la littérature})",
            vec![("手紙", 3.into()), ("la littérature", 4.into())],
            12.into(),
        ),
        ("手紙+${howdy}", vec![("手紙", 7.into())], 7.into()),
    ];
    for (source, constants, expected) in cases {
        assert_eq!(
            evaluate_with_constants(source, &constants),
            expected,
            "for {:?}",
            source
        );
    }
}

#[test]
fn test_functions_with_constants() {
    let cases: Vec<(&str, Vec<(&str, Value)>, Value)> = vec![
        (
            "if(${a}, ${b}, ${c})",
            vec![("a", true.into()), ("b", 100.into()), ("c", 1000.into())],
            100.into(),
        ),
        (
            "if(${a}, ${b}, ${c})",
            vec![("a", 0.into()), ("b", 100.into()), ("c", 1000.into())],
            1000.into(),
        ),
        (
            "coalesce(${a}, ${b}, ${c})",
            vec![("a", 0.into()), ("b", 100.into()), ("c", 1000.into())],
            100.into(),
        ),
        (
            "coalesce(${a}, ${c}, ${b})",
            vec![("a", 0.into()), ("b", 100.into()), ("c", 1000.into())],
            1000.into(),
        ),
        (
            "if(a, b, c)",
            vec![("a", false.into()), ("b", "hello".into()), ("c", "goodbye".into())],
            "goodbye".into(),
        ),
        (
            "if(a, b, c)",
            vec![("a", "true".into()), ("b", "hello".into()), ("c", "goodbye".into())],
            "hello".into(),
        ),
        (
            "if(a, b, c)",
            vec![
                ("a", Value::from(Vec::<Value>::new())),
                ("b", Value::from(vec![Value::from("a"), Value::from("b")])),
                ("c", Value::from(vec![Value::from("a"), Value::from("c")])),
            ],
            Value::from(vec![Value::from("a"), Value::from("c")]),
        ),
    ];
    for (source, constants, expected) in cases {
        assert_eq!(
            evaluate_with_constants(source, &constants),
            expected,
            "for {:?}",
            source
        );
    }
}

#[test]
fn test_string_constant() {
    let mut env = Environment::new();
    env.define("const", "string constant");
    assert_eq!(env.evaluate("const").unwrap(), Value::from("string constant"));
}

#[test]
fn test_constant_names_with_dots_and_underscores() {
    let mut env = Environment::new();
    env.define_constant("order.total_net", 80);
    env.define_constant("_vat", 0.25);
    assert_eq!(
        env.evaluate("order.total_net * (1 + _vat)").unwrap(),
        Value::from(100)
    );
}
