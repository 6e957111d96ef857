//! Property tests for the parsing pipeline.
//!
//! Parsing must be total and deterministic on any text, including comment
//! shaped input with unbalanced delimiters and broken embedded JSON.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::cache::AnnotationCache;
    use crate::coerce::{coerce, split_top_level};
    use crate::parser::{parse_annotations, parse_annotations_strict};
    use crate::value::AnnotationValue;

    /// Strategy for completely random strings.
    fn arbitrary_string() -> impl Strategy<Value = String> {
        prop::collection::vec(any::<char>(), 0..500).prop_map(|chars| chars.into_iter().collect())
    }

    /// Strategy for values as they appear after `=` or after a name.
    fn value_text() -> impl Strategy<Value = String> {
        prop_oneof![
            "[0-9]{1,6}".prop_map(String::from),
            "-?[0-9]{1,4}\\.[0-9]{1,3}".prop_map(String::from),
            "[a-z][a-z ]{0,12}".prop_map(String::from),
            r#""[a-z, ]{0,10}""#.prop_map(String::from),
            "(true|false|TRUE|False)".prop_map(String::from),
            "\\[[a-z0-9, ]{0,12}\\]".prop_map(String::from),
            r#"\{"[a-z]{1,4}": [0-9]{1,3}\}"#.prop_map(String::from),
            "\\{[a-z ]{0,6}\\}".prop_map(String::from),
        ]
    }

    /// Strategy for one annotation line, sometimes opening a multi-line block.
    fn annotation_line() -> impl Strategy<Value = String> {
        let name = "[A-Za-z][A-Za-z0-9_]{0,8}";
        prop_oneof![
            name.prop_map(|n| format!("@{n}")),
            (name, value_text()).prop_map(|(n, v)| format!("@{n} {v}")),
            (name, "[a-z]{1,5}", value_text()).prop_map(|(n, k, v)| format!("@{n}({k} = {v})")),
            (name, "[a-z]{1,5}", value_text()).prop_map(|(n, k, v)| format!("@{n}(\n * {k} = {v},")),
            Just(")".to_string()),
            "[a-z .,@]{0,30}".prop_map(String::from),
        ]
    }

    /// Strategy for a decorated doc comment built from annotation lines,
    /// sometimes preceded by blank lines.
    fn doc_comment() -> impl Strategy<Value = String> {
        (0..3usize, prop::collection::vec(annotation_line(), 0..12)).prop_map(|(blank, lines)| {
            let body: Vec<String> = lines.into_iter().map(|l| format!(" * {l}")).collect();
            format!("{}/**\n{}\n */", "\n".repeat(blank), body.join("\n"))
        })
    }

    /// Strategy for delimiter soup.
    fn unbalanced_delimiters() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just("(".to_string()),
                Just(")".to_string()),
                Just("[".to_string()),
                Just("]".to_string()),
                Just("{".to_string()),
                Just("}".to_string()),
                Just("\"".to_string()),
                Just(",".to_string()),
                Just("=".to_string()),
                Just("@a".to_string()),
                Just("\n".to_string()),
                Just(" ".to_string()),
            ],
            1..60,
        )
        .prop_map(|parts| parts.join(""))
    }

    fn numeric_edge_cases() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("-0".to_string()),
            Just("9223372036854775807".to_string()),
            Just("-9223372036854775808".to_string()),
            Just("99999999999999999999999999999999".to_string()),
            Just("1e308".to_string()),
            Just("1e999".to_string()),
            Just("5.".to_string()),
            Just("5e".to_string()),
            Just("NaN".to_string()),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Parsing never panics on arbitrary input.
        #[test]
        fn parse_never_panics_on_arbitrary_input(input in arbitrary_string()) {
            let _ = parse_annotations(&input);
        }

        /// Parsing never panics on unbalanced delimiters.
        #[test]
        fn parse_never_panics_on_unbalanced(input in unbalanced_delimiters()) {
            let _ = parse_annotations(&input);
            let _ = parse_annotations_strict(&input);
        }

        /// The same text always yields the same table.
        #[test]
        fn parse_is_idempotent(doc in doc_comment()) {
            prop_assert_eq!(parse_annotations(&doc), parse_annotations(&doc));
        }

        /// Strict parsing fails exactly when lenient parsing recorded an invalid value.
        #[test]
        fn strict_agrees_with_lenient(doc in doc_comment()) {
            let lenient = parse_annotations(&doc);
            match parse_annotations_strict(&doc) {
                Ok(strict) => {
                    prop_assert!(lenient.invalid_values().is_empty());
                    prop_assert_eq!(strict, lenient);
                }
                Err(_) => prop_assert!(!lenient.invalid_values().is_empty()),
            }
        }

        /// Every table key is lowercase and unique.
        #[test]
        fn keys_are_lowercase_and_unique(doc in doc_comment()) {
            let table = parse_annotations(&doc);
            let names: Vec<&str> = table.names().collect();
            for (i, name) in names.iter().enumerate() {
                prop_assert_eq!(name.to_lowercase(), *name);
                prop_assert!(!names[i + 1..].contains(name));
            }
        }

        /// The cache hands out the same table a direct parse builds.
        #[test]
        fn cache_matches_direct_parse(doc in doc_comment()) {
            let cache = AnnotationCache::new();
            prop_assert_eq!(&*cache.get_text(&doc), &parse_annotations(&doc));
        }

        /// Splitting keeps every character except top-level commas.
        #[test]
        fn split_preserves_text(input in unbalanced_delimiters()) {
            let segments = split_top_level(&input);
            let rejoined = segments.join(",");
            prop_assert_eq!(rejoined, input);
        }

        /// Numeric edge cases coerce to a number or fall back to text.
        #[test]
        fn numeric_edge_cases_coerce(input in numeric_edge_cases()) {
            let value = coerce(&input).unwrap();
            let is_number_or_text = matches!(
                value,
                AnnotationValue::Int(_) | AnnotationValue::Float(_) | AnnotationValue::Str(_)
            );
            prop_assert!(is_number_or_text);
        }
    }
}
