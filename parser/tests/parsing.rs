use anno_parser::{
    annotations_for, parse_annotations, AnnotationCache, AnnotationTable, AnnotationValue, Params,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn s(v: &str) -> AnnotationValue {
    AnnotationValue::from(v)
}

fn params(pairs: &[(&str, AnnotationValue)]) -> AnnotationValue {
    AnnotationValue::Map(pairs.iter().map(|(k, v)| (*k, v.clone())).collect::<Params>())
}

fn table(entries: &[(&str, AnnotationValue)]) -> AnnotationTable {
    entries.iter().map(|(k, v)| (*k, v.clone())).collect()
}

#[test]
fn test_one_annotation_no_params() {
    let doc = r#"/**
 * This is a comment that contains a single annotation with no parameters.
 *
 * @Entity
 */"#;

    assert_eq!(parse_annotations(doc), table(&[("entity", AnnotationValue::Bool(true))]));
}

#[test]
fn test_single_value_annotation() {
    let doc = r#"/**
 * This is a comment that contains a single annotation with a single value
 *
 * @Entity is awesome!
 */"#;

    assert_eq!(parse_annotations(doc)["entity"], s("is awesome!"));
}

#[test]
fn test_single_value_as_list() {
    let doc = "/**\n * @LikesToEat [ cheese, kraft dinner, hot dogs ]\n */";
    let annotations = parse_annotations(doc);

    assert_eq!(
        annotations["LikesToEat"],
        AnnotationValue::List(vec![s("cheese"), s("kraft dinner"), s("hot dogs")])
    );
}

#[test]
fn test_one_annotation_with_params() {
    let doc = r#"/**
 * @Entity(name = table, desc = Entity that represents a table, parent = database)
 */"#;

    assert_eq!(
        parse_annotations(doc)["entity"],
        params(&[
            ("name", s("table")),
            ("desc", s("Entity that represents a table")),
            ("parent", s("database")),
        ])
    );
}

#[test]
fn test_multiple_annotations_multiple_params() {
    let doc = r#"/**
 * This is a comment that contains multiple annotations with multiple parameters
 *
 * @Hotdog(brand = Maple Leaf, bun = true, cooking_method = BBQ)
 * @Hamburger(brand = Home Made, bun = true, cooking_method = BBQ)
 * @KraftDinner(brand = Kraft, bun = false, cooking_method = stove)
 */"#;

    let annotations = parse_annotations(doc);

    assert_eq!(
        annotations.names().collect::<Vec<_>>(),
        vec!["hotdog", "hamburger", "kraftdinner"]
    );
    assert_eq!(
        annotations["kraftdinner"],
        params(&[
            ("brand", s("Kraft")),
            ("bun", AnnotationValue::Bool(false)),
            ("cooking_method", s("stove")),
        ])
    );
    assert!(annotations.has_annotation(&["hotdog", "bun"]));
    assert!(!annotations.has_annotation(&["hotdog", "bread"]));
}

#[test]
fn test_list_values_inside_params() {
    let doc = r#"/**
 * @HasArray(array = [ one, two, three ])
 * @HasTwoArrays(array1 = [ four, five, six ], array2 = [ seven, eight, nine ])
 */"#;

    let annotations = parse_annotations(doc);
    let list = |items: &[&str]| AnnotationValue::List(items.iter().map(|i| s(i)).collect());

    assert_eq!(annotations["hasarray"], params(&[("array", list(&["one", "two", "three"]))]));
    assert_eq!(
        annotations["hastwoarrays"],
        params(&[
            ("array1", list(&["four", "five", "six"])),
            ("array2", list(&["seven", "eight", "nine"])),
        ])
    );
}

#[test]
fn test_quoted_value_with_commas() {
    let expected = "This is a description, contained in quotes, that has commas";
    let doc = format!("/**\n * @Description(value = \"{expected}\")\n */");

    assert_eq!(
        parse_annotations(&doc)["description"],
        params(&[("value", s(expected))])
    );
}

#[test]
fn test_quoted_literals_are_recoerced() {
    let annotations = parse_annotations("@Flags(on = \"true\", count = \"123\", label = \"x\")");

    assert_eq!(
        annotations["flags"],
        params(&[
            ("on", AnnotationValue::Bool(true)),
            ("count", AnnotationValue::Int(123)),
            ("label", s("x")),
        ])
    );
}

#[test]
fn test_repeated_names_become_a_list() {
    let annotations = parse_annotations("@param Value1\n@param Value2\n@PARAM Value3");

    assert_eq!(
        annotations["param"],
        AnnotationValue::List(vec![s("Value1"), s("Value2"), s("Value3")])
    );
    assert_eq!(annotations.as_list("param").len(), 3);
}

#[test]
fn test_as_list_wraps_single_values() {
    let annotations = parse_annotations("@Entity(table = users)\n@Id");

    assert_eq!(annotations.as_list("entity"), vec![params(&[("table", s("users"))])]);
    assert_eq!(annotations.as_list("id"), vec![AnnotationValue::Bool(true)]);
    assert!(annotations.as_list("missing").is_empty());
}

#[test]
fn test_multi_line_matches_single_line() {
    let multi = r#"/**
 * @Worker(
 *   queue = mail,
 *   retries = 3,
 *   backoff = 1.5
 * )
 * @Enabled
 */"#;
    let single = "/** @Worker(queue = mail, retries = 3, backoff = 1.5)\n * @Enabled */";

    let expected = table(&[
        (
            "worker",
            params(&[
                ("queue", s("mail")),
                ("retries", AnnotationValue::Int(3)),
                ("backoff", AnnotationValue::Float(1.5)),
            ]),
        ),
        ("enabled", AnnotationValue::Bool(true)),
    ]);

    assert_eq!(parse_annotations(multi), expected);
    assert_eq!(parse_annotations(single), expected);
}

#[test]
fn test_marker_inside_open_block_is_not_lost() {
    let doc = " * @Broken(\n *   a = 1,\n * @Next(b = 2)\n";
    let annotations = parse_annotations(doc);

    assert_eq!(annotations["broken"], params(&[("a", AnnotationValue::Int(1))]));
    assert_eq!(annotations["next"], params(&[("b", AnnotationValue::Int(2))]));
}

#[test]
fn test_unterminated_block_at_end_of_input() {
    let annotations = parse_annotations(" * @Open(\n *   a = 1,\n *   b = two\n");

    assert_eq!(
        annotations["open"],
        params(&[("a", AnnotationValue::Int(1)), ("b", s("two"))])
    );
}

#[test]
fn test_numeric_coercion() {
    let annotations = parse_annotations("@Whole 3.0\n@Pi 3.14\n@Neg -7");

    assert_eq!(annotations["whole"], AnnotationValue::Int(3));
    assert_eq!(annotations["pi"], AnnotationValue::Float(3.14));
    assert_eq!(annotations["neg"], AnnotationValue::Int(-7));
}

#[test]
fn test_embedded_json_is_not_recoerced() {
    let doc = r#"/**
 * @MenuData {"root":{"child":{"arraychild":[0,1,2,3]}}}
 * @Labels {"on": "true", "count": "5"}
 */"#;

    let annotations = parse_annotations(doc);

    assert_eq!(
        annotations["menudata"],
        AnnotationValue::Json(json!({"root": {"child": {"arraychild": [0, 1, 2, 3]}}}))
    );
    assert_eq!(
        annotations["labels"],
        AnnotationValue::Json(json!({"on": "true", "count": "5"}))
    );
    assert!(annotations.has_annotation(&["menudata", "root", "child", "arraychild", "3"]));
    assert!(!annotations.has_annotation(&["menudata", "root", "child", "arraychild", "4"]));
}

#[test]
fn test_prose_mentions_are_not_annotations() {
    let doc = r#"/**
 * Contact philip@zeptech.ca for details.
 *
 * @author Philip Graham <philip@zeptech.ca>
 */"#;

    assert_eq!(
        parse_annotations(doc),
        table(&[("author", s("Philip Graham <philip@zeptech.ca>"))])
    );
}

#[test]
fn test_parsing_is_idempotent() {
    let doc = "/**\n * @A(x = [1, 2], y = {\"k\": null})\n * @B\n * @B \"q\"\n */";
    assert_eq!(parse_annotations(doc), parse_annotations(doc));
}

#[test]
fn test_comment_sources() {
    let declaration = json!({"name": "User", "doc": "/** @Entity(table = users) */"});
    let absent = json!({"name": "Legacy", "doc": null});
    let uncommented = json!({"name": "Helper"});

    assert!(annotations_for(&declaration).unwrap().contains("Entity"));
    assert!(annotations_for(&absent).unwrap().is_empty());
    assert!(annotations_for(&uncommented).is_err());
    assert!(annotations_for(&json!(42)).is_err());
}

#[test]
fn test_cache_returns_equal_tables() {
    let cache = AnnotationCache::new();
    let doc = "/** @Entity(table = users) */";

    assert_eq!(*cache.get_text(doc), parse_annotations(doc));
}

#[test]
fn test_table_serializes_in_document_order() {
    let annotations = parse_annotations("@Entity(table = users, id = 7)\n@Tags [a, b]\n@Tags c");

    assert_eq!(
        serde_json::to_value(&annotations).unwrap(),
        json!({"entity": {"table": "users", "id": 7}, "tags": ["a", "b", "c"]})
    );
}
