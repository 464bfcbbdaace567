//! Training pairs from a vertical corpus.
//!
//! Input is the token-per-line ("vertical") export of a tagged corpus: XML
//! structure lines (`<doc ...>`, `<s>`) interleaved with whitespace separated
//! token lines whose first field is the surface form and last field the lemma.
//! Only pairs where the surface form differs from the lemma are kept, since
//! those are the inflections and derivations a model has to learn.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

use crate::table::DelimitedWriter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordLemma {
    pub word: String,
    pub lemma: String,
}

fn is_token_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('<')
}

/// At least two characters, at least one letter, not punctuation only.
pub fn is_valid_word(word: &str) -> bool {
    if word.chars().count() < 2 {
        return false;
    }
    if !word.chars().any(char::is_alphabetic) {
        return false;
    }
    !word.chars().all(|c| c.is_ascii_punctuation())
}

fn extract_pair(line: &str) -> Option<WordLemma> {
    if !is_token_line(line) {
        return None;
    }
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return None;
    }
    let word = parts[0];
    let lemma = parts[parts.len() - 1];
    if word.to_lowercase() == lemma.to_lowercase() || !is_valid_word(word) || !is_valid_word(lemma)
    {
        return None;
    }
    Some(WordLemma {
        word: word.to_string(),
        lemma: lemma.to_string(),
    })
}

pub fn filter_corpus<R: BufRead>(reader: R) -> Result<Vec<WordLemma>> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read corpus line {}", idx + 1))?;
        if let Some(pair) = extract_pair(&line) {
            out.push(pair);
        }
    }
    Ok(out)
}

/// Filter `input` and write a `Word,Lemma` CSV to `output`. Returns the
/// number of pairs written.
pub fn filter_corpus_file(input: &Path, output: &Path) -> Result<usize> {
    let file =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let pairs = filter_corpus(BufReader::new(file))?;

    let mut w = DelimitedWriter::create(output, ',')
        .with_context(|| format!("failed to create {}", output.display()))?;
    w.write_row(["Word", "Lemma"])?;
    for p in &pairs {
        w.write_row([p.word.as_str(), p.lemma.as_str()])?;
    }
    w.flush()?;

    info!(pairs = pairs.len(), output = %output.display(), "corpus filtered");
    Ok(pairs.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_words() {
        assert!(is_valid_word("ir"));
        assert!(is_valid_word("Rīgā"));
        assert!(is_valid_word("C-4"));
        assert!(!is_valid_word("a"));
        assert!(!is_valid_word("12"));
        assert!(!is_valid_word("..."));
        assert!(!is_valid_word("—"));
    }

    #[test]
    fn token_lines_only() {
        let input = "<doc id=\"1\">\n<s>\nmājās\tNCFPL\tmāja\n\n.\tZS\t.\n</s>\n";
        let pairs = filter_corpus(input.as_bytes()).unwrap();
        assert_eq!(
            pairs,
            vec![WordLemma { word: "mājās".into(), lemma: "māja".into() }]
        );
    }

    #[test]
    fn identical_forms_are_dropped() {
        let input = "Iet\tv\tiet\nir\tv\tbūt\nviņš\tp\n";
        let pairs = filter_corpus(input.as_bytes()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].word, "ir");
        assert_eq!(pairs[0].lemma, "būt");
    }

    #[test]
    fn writes_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("corpus.vert");
        let output = dir.path().join("pairs.csv");
        std::fs::write(&input, "<s>\ngāja\tvmnis\tiet\n</s>\n").unwrap();

        let n = filter_corpus_file(&input, &output).unwrap();
        assert_eq!(n, 1);
        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(text, "\u{feff}Word,Lemma\r\ngāja,iet\r\n");
    }
}
