use std::time::Duration;

use lvderiv_corpus::{FixedFrequencies, FrequencyTier};
use lvderiv_llm::MockBackend;
use lvderiv_rules::apply_rule;
use lvderiv_sweep::{
    should_evaluate, RegexSweep, SweepConfig, TransformationCategory, EVALUATION_LEMMAS,
    TRANSFORMATIONS,
};

fn config(dir: &tempfile::TempDir) -> SweepConfig {
    SweepConfig::new(dir.path().join("mock_rules.tsv")).with_model_delay(Duration::ZERO)
}

#[test]
fn full_catalog_sweep_with_mixed_rules() {
    let dir = tempfile::tempdir().unwrap();
    let backend =
        MockBackend::always("s#t$#šana#\nnot a rule\ns#(#x#\ns#^(.*?)ne$#\\1ņots#");
    let validator = FixedFrequencies::new().with("sākšana", 12);

    let records = RegexSweep::new(&backend, &validator, config(&dir))
        .run()
        .unwrap();

    // One request per category, in catalog order.
    let prompts = backend.prompts();
    assert_eq!(prompts.len(), TRANSFORMATIONS.len());
    for (prompt, cat) in prompts.iter().zip(TRANSFORMATIONS) {
        assert!(prompt.contains(&format!("no semantiskās kategorijas {} ", cat.source)));
    }

    // Every raw line lands in the rules table, broken ones included.
    let rules = std::fs::read_to_string(dir.path().join("mock_rules.tsv")).unwrap();
    assert_eq!(rules.matches("\r\n").count(), TRANSFORMATIONS.len() * 4);
    assert_eq!(rules.matches("not a rule").count(), TRANSFORMATIONS.len());

    assert!(!records.is_empty());
    for r in &records {
        assert!(r.rule == "s#t$#šana#" || r.rule == "s#^(.*?)ne$#\\1ņots#");
        assert_eq!(apply_rule(&r.lemma, &r.rule), r.candidate);
        assert!(!r.candidate.is_empty());
    }

    let zvaigzne: Vec<_> = records.iter().filter(|r| r.lemma == "zvaigzne").collect();
    assert!(!zvaigzne.is_empty());
    assert!(zvaigzne.iter().all(|r| r.candidate == "zvaigzņots"));
    assert!(records
        .iter()
        .any(|r| r.lemma == "veikt" && r.candidate == "veikšana"));
}

#[test]
fn skipped_pairs_never_produce_records() {
    let dir = tempfile::tempdir().unwrap();
    let backend = MockBackend::always("s#$#x#");
    let validator = FixedFrequencies::new();

    let records = RegexSweep::new(&backend, &validator, config(&dir))
        .run()
        .unwrap();

    let mut expected = 0;
    for cat in TRANSFORMATIONS {
        expected += EVALUATION_LEMMAS
            .iter()
            .filter(|l| should_evaluate(l, cat))
            .count();
    }
    assert_eq!(records.len(), expected);
    assert!(records.iter().all(|r| r.candidate == format!("{}x", r.lemma)));
}

#[test]
fn model_failure_skips_only_that_category() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = [
        TransformationCategory {
            source: "Būt procesā",
            target: "Process",
            examples: &[("sākt", "sākšana")],
        },
        TransformationCategory {
            source: "Darīt",
            target: "Darbība",
            examples: &[("brīdināt", "brīdināšana")],
        },
    ];
    let backend = MockBackend::scripted(vec![None, Some("s#t$#šana#".into())]);
    let validator = FixedFrequencies::new();

    let records = RegexSweep::new(&backend, &validator, config(&dir))
        .with_catalog(&catalog)
        .run()
        .unwrap();

    assert_eq!(backend.prompts().len(), 2);
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.target == "Darbība"));

    let rules = std::fs::read_to_string(dir.path().join("mock_rules.tsv")).unwrap();
    assert!(!rules.contains("Būt procesā"));
    assert!(rules.contains("Darīt\tDarbība\ts#t$#šana#"));
}

#[test]
fn validator_failure_degrades_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = [TRANSFORMATIONS[4]];
    let lemmas = [EVALUATION_LEMMAS[2], EVALUATION_LEMMAS[8]];
    assert_eq!((lemmas[0].text, lemmas[1].text), ("pūst", "iet"));

    let backend = MockBackend::always("s#t$#šana#");
    let validator = FixedFrequencies::new().failing("pūsšana").with("iešana", 5000);

    let records = RegexSweep::new(&backend, &validator, config(&dir))
        .with_catalog(&catalog)
        .with_lemmas(&lemmas)
        .run()
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].candidate, "pūsšana");
    assert_eq!(records[0].validation.tier, FrequencyTier::ValidationError);
    assert_eq!(records[0].validation.frequency, None);
    assert_eq!(records[1].candidate, "iešana");
    assert_eq!(records[1].validation.tier, FrequencyTier::Frequent);
}

#[test]
fn rules_table_accumulates_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = [TRANSFORMATIONS[0]];
    let validator = FixedFrequencies::new();

    for _ in 0..2 {
        let backend = MockBackend::always("s#t$#šana#");
        RegexSweep::new(&backend, &validator, config(&dir))
            .with_catalog(&catalog)
            .with_lemmas(&[])
            .run()
            .unwrap();
    }

    let bytes = std::fs::read(dir.path().join("mock_rules.tsv")).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.matches('\u{feff}').count(), 1);
    assert_eq!(text.matches("Darīt\tDarbība\ts#t$#šana#\r\n").count(), 2);
}
