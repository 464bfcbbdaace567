//! Prompt templates.
//!
//! Prompts are written in Latvian; models answer noticeably better about
//! Latvian morphology when asked in Latvian.

use crate::catalog::{EvaluationLemma, TransformationCategory};

fn tuples(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(a, b)| format!("('{a}', '{b}')"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `[('a', 'b'), ('c', 'd')]`, the list form used in derivation prompts.
pub fn render_pairs(pairs: &[(&str, &str)]) -> String {
    format!("[{}]", tuples(pairs))
}

/// `{('a', 'b'), ('c', 'd')}`, the set form used in rule prompts.
pub fn render_pair_set(pairs: &[(&str, &str)]) -> String {
    format!("{{{}}}", tuples(pairs))
}

/// Ask for sed-style rules generalizing the category's examples.
pub fn rule_prompt(category: &TransformationCategory) -> String {
    format!(
        "Doti pāri {examples}, kas veic vārdu atvasināšanu no semantiskās kategorijas {source} \
         uz semantisko kategoriju {target}. Iegūsti no šiem pāriem vispārējus latviešu valodas \
         pārveidojumu likumus un uzraksti pēc iespējas visaptverošākus sed likumus formātā \
         s#^(.*?){{vecais}}$#\\1{{jaunais}}#. Likums drīkst saturēt tieši vienu notveramo grupu \
         (.*?), un aizvietošanas daļā izmanto tikai \\1 + fiksētu sufiksu. Nekad neraksti otru \\1 \
         un neievieto SOH simbolu. Atbildē drīkst būt tikai un vienīgi teksta formātā, kur katrs \
         likums ir atsevišķā rindā. Rinda sākas ar 's#' un beidzas ar '#', bez jebkāda cita \
         teksta vai formatējuma.",
        examples = render_pair_set(category.examples),
        source = category.source,
        target = category.target,
    )
}

/// Ask directly for derivatives of one lemma, with `<derivative>, <explanation>` lines.
///
/// With `examples` set (few-shot) the worked pairs are prepended, even when
/// the list is empty.
pub fn derivation_prompt(lemma: &EvaluationLemma, examples: Option<&[(&str, &str)]>) -> String {
    let mut prompt = String::new();
    if let Some(examples) = examples {
        prompt.push_str(&format!(
            "Tev ir doti atvasinājumu piemēri {}. ",
            render_pairs(examples)
        ));
    }
    prompt.push_str(&format!(
        "Dotā lemma ir '{lemma}' ar semantisko kategoriju '{source}'. Izveido no šīs lemmas vienu \
         vai vairākus atvasinājumus, kas ir ar semantisko kategoriju '{target}' (locījumi nav \
         jāsniedz) latviešu valodā un īsi paskaidro, kādas morfoloģiskās izmaiņas ir \
         nepieciešamas, lai to panāktu. Atbildē katrai rindai ir jābūt tikai un vienīgi šādā \
         formātā bez jebkāda cita formatējuma: '<Atvasinājums>, <Paskaidrojums>'.",
        lemma = lemma.text,
        source = lemma.source,
        target = lemma.target,
    ));
    prompt
}

/// Non-empty trimmed lines of a model response.
pub fn response_lines(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
