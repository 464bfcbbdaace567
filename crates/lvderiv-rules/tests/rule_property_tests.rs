use lvderiv_rules::{apply_rule, escape_control, unescape_control, DerivationRule};
use proptest::prelude::*;

/// Patterns built from a small alphabet of always-valid pieces.
fn pattern() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-zāčēģīķļņšūž]{1,3}",
        Just("(.*?)".to_string()),
        Just("^".to_string()),
        Just("$".to_string()),
        Just("[aeiu]".to_string()),
        Just(".".to_string()),
    ];
    proptest::collection::vec(piece, 1..5).prop_map(|v| v.concat())
}

fn replacement() -> impl Strategy<Value = String> {
    "[a-zāčēģīķļņšūž\\\\1]{0,8}"
}

fn lemma() -> impl Strategy<Value = String> {
    "[a-zāčēģīķļņšūž]{0,12}"
}

/// Rule text with raw control characters sprinkled in, but no backslashes.
fn rule_with_controls() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            "[s#^$().*?a-zāšž]{1,4}",
            Just("\u{1}".to_string()),
            Just("\t".to_string()),
            Just("\n".to_string()),
            Just("\r".to_string()),
            Just("\u{7f}".to_string()),
            Just("\u{1b}".to_string()),
        ],
        0..8,
    )
    .prop_map(|v| v.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn well_formed_rules_parse_to_their_segments(p in pattern(), r in replacement()) {
        let line = format!("s#{p}#{r}#");
        let rule = DerivationRule::parse(&line).expect("parse");
        prop_assert_eq!(rule.pattern(), p.as_str());
        prop_assert_eq!(rule.replacement(), r.as_str());
    }

    #[test]
    fn lines_without_the_prefix_are_rejected(body in "[^\\x01]{0,20}") {
        prop_assume!(!body.starts_with("s#"));
        prop_assert!(DerivationRule::parse(&body).is_err());
    }

    #[test]
    fn applying_is_deterministic(p in pattern(), r in replacement(), w in lemma()) {
        let line = format!("s#{p}#{r}#");
        prop_assert_eq!(apply_rule(&w, &line), apply_rule(&w, &line));
    }

    #[test]
    fn absent_literal_never_yields_a_candidate(w in "[a-k]{0,12}", lit in "[x-z]{1,3}") {
        let line = format!("s#{lit}#q#");
        prop_assert_eq!(apply_rule(&w, &line), "");
    }

    #[test]
    fn escaping_roundtrips(raw in rule_with_controls()) {
        let escaped = escape_control(&raw);
        let clean = !escaped.chars().any(|c| (c as u32) < 0x20 || c == '\x7f');
        prop_assert!(clean, "control character left in {:?}", escaped);
        let back = unescape_control(&escaped).into_owned();
        prop_assert_eq!(back, raw);
    }
}
