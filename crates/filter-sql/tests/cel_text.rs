//! Filters given as CEL text, parsed and checked before rendering.

use filter_sql::{Converter, FilterError, GenerateError, convert};
use tracing_test::traced_test;

fn sql(text: &str) -> String {
    convert(text).unwrap_or_else(|err| panic!("`{text}` failed: {err}"))
}

#[traced_test]
#[test]
fn test_default_scenarios() {
    let cases = [
        (r#"i.name == "j2gg0s""#, r#"(name == "j2gg0s")"#),
        ("i.age + 10 < 28", "((age + 10) < 28)"),
        (
            r#"i.name == "j2gg0s" && (i.age > 18 || i.city == "Shanghai")"#,
            r#"((name == "j2gg0s") AND ((age > 18) OR (city == "Shanghai")))"#,
        ),
        ("!i.joined", "(NOT joined)"),
        (r#"i.name.startsWith("j")"#, r#"(name LIKE "j%")"#),
        (
            "i.birthtime < timestamp(1704067200)",
            "(birthtime < FROM_UNIXTIME(1704067200))",
        ),
        ("-i.age > -18", "((- age) > -18)"),
    ];
    for (text, expected) in cases {
        assert_eq!(sql(text), expected, "{text}");
    }
}

#[test]
fn test_suffix_and_timestamp_text() {
    assert_eq!(sql(r#"i.name.endsWith("0s")"#), r#"(name LIKE "%0s")"#);

    let converter = Converter::builder()
        .with_time_zone_name("Asia/Shanghai")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        converter
            .convert(r#"i.birthtime < timestamp("2024-01-01T00:00:00Z")"#)
            .unwrap(),
        r#"(birthtime < "2024-01-01 08:00:00")"#
    );
}

#[test]
fn test_field_mapping_from_text() {
    let converter = Converter::builder()
        .with_sql_name("profile.age", "user_age")
        .build()
        .unwrap();
    assert_eq!(
        converter.convert("i.profile.age >= 21").unwrap(),
        "(user_age >= 21)"
    );
}

#[test]
fn test_non_literal_pattern_is_rejected_by_generator() {
    let err = convert("i.name.startsWith(i.prefix)").unwrap_err();
    assert!(
        matches!(err, FilterError::Generate(GenerateError::LiteralRequired { .. })),
        "{err}"
    );
}

#[test]
fn test_foreign_root_is_rejected_by_checker() {
    let err = convert("x.age > 1").unwrap_err();
    assert!(matches!(err, FilterError::Compile(_)), "{err}");
}

#[test]
fn test_unlisted_function_is_rejected_by_checker() {
    let err = convert(r#"i.name.contains("j")"#).unwrap_err();
    assert!(matches!(err, FilterError::Compile(_)), "{err}");
}

#[test]
fn test_disabled_function_is_rejected() {
    let converter = Converter::builder().disable_function("_%_").build().unwrap();
    let err = converter.convert("i.age % 2 == 0").unwrap_err();
    assert!(matches!(err, FilterError::Compile(_)), "{err}");
}

#[test]
fn test_syntax_error_is_a_compile_error() {
    let err = convert("i.age >").unwrap_err();
    assert!(matches!(err, FilterError::Compile(ref e) if e.text == "i.age >"));
}
