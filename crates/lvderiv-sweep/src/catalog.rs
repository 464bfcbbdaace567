//! Fixed reference tables: transformation categories and evaluation lemmas.
//!
//! Category labels are kept in Latvian, exactly as they appear in the
//! annotation scheme; they are opaque strings to the rest of the code.

/// A (source, target) semantic category pair with worked examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformationCategory {
    pub source: &'static str,
    pub target: &'static str,
    /// `(source word, derived word)`; order carries no meaning.
    pub examples: &'static [(&'static str, &'static str)],
}

/// A lemma from the evaluation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationLemma {
    pub text: &'static str,
    /// Lemma group: `V` dictionary words, `I` irregular, `J` neologisms, `N` nonce words.
    pub group: &'static str,
    pub source: &'static str,
    pub target: &'static str,
}

pub static TRANSFORMATIONS: &[TransformationCategory] = &[
    TransformationCategory {
        source: "Darīt",
        target: "Darbība",
        examples: &[
            ("aizsargāt", "aizsardzība"),
            ("brīdināt", "brīdināšana"),
            ("uzvarēt", "uzvarēšana"),
            ("draudēt", "draudēšana"),
            ("uzskatīt", "uzskatīt"),
        ],
    },
    TransformationCategory {
        source: "Darīt",
        target: "Rezultāts",
        examples: &[
            ("ierosināt", "ierosme"),
            ("skolot", "skolojums"),
            ("maksāt", "maksājums"),
            ("dziedāt", "dziesma"),
            ("izpildīt", "izpildījums"),
        ],
    },
    TransformationCategory {
        source: "Darīt",
        target: "Darītājs (dzīvs)",
        examples: &[
            ("tulkot", "tulks"),
            ("ārstēt", "ārsts"),
            ("maksāt", "maksātājs"),
            ("aizliegt", "aizliedzējs"),
            ("skriet", "skrējējs"),
        ],
    },
    TransformationCategory {
        source: "Priekšmets",
        target: "Ietver nosaukto",
        examples: &[
            ("mežģīne", "mežģīņots"),
            ("mīkla", "mīklains"),
            ("zvaigzne", "zvaigžņots"),
            ("ķiploks", "ķiplokots"),
            ("poga", "pogains"),
        ],
    },
    TransformationCategory {
        source: "Būt procesā",
        target: "Process",
        examples: &[
            ("skriet", "skrējums"),
            ("aizsākt", "aizsākšana"),
            ("sākt", "sākšana"),
            ("iegūt", "iegūšana"),
            ("identificēt", "identificēšanās"),
        ],
    },
    TransformationCategory {
        source: "Būt stāvoklī",
        target: "Stāvoklis",
        examples: &[
            ("draudēt", "draudi"),
            ("vajadzēt", "vajadzēšana"),
            ("veikties", "veiksme"),
            ("kontrolēt", "kontrole"),
            ("pielūgt", "pielūgšana"),
        ],
    },
    TransformationCategory {
        source: "Abstrakts nojēgums",
        target: "Saistīts ar nosaukto",
        examples: &[
            ("statistika", "statistisks"),
            ("ģenētika", "ģenētisks"),
            ("ķīmija", "ķīmisks"),
            ("sabiedrība", "sabiedrisks"),
            ("tehnika", "tehnisks"),
        ],
    },
    TransformationCategory {
        source: "Darīt",
        target: "Vieta (lietvārds)",
        examples: &[
            ("dzīt", "dzītuve"),
            ("lūgt", "lūgtuve"),
            ("ražot", "ražotava"),
            ("ēst", "ēdnīca"),
            ("dzīvot", "dzīvoklis"),
        ],
    },
    TransformationCategory {
        source: "Darīt",
        target: "Cits",
        examples: &[
            ("vest", "vezums"),
            ("dziedāt", "dziedāšana"),
            ("zīst", "zīdeklis"),
            ("aizsargāt", "aizsardzība"),
            ("kaitēt", "kaitēklis"),
        ],
    },
    TransformationCategory {
        source: "Darīt",
        target: "Instruments",
        examples: &[
            ("dzirdēt", "dzirdeklis"),
            ("redzēt", "redzoklis"),
            ("kliegt", "kliedzamais"),
            ("miglot", "miglotājs"),
            ("aizsargāt", "aizsargs"),
        ],
    },
];

const fn lemma(
    text: &'static str,
    group: &'static str,
    source: &'static str,
    target: &'static str,
) -> EvaluationLemma {
    EvaluationLemma {
        text,
        group,
        source,
        target,
    }
}

pub static EVALUATION_LEMMAS: &[EvaluationLemma] = &[
    lemma("veikt", "V", "Darīt", "Rezultāts"),
    lemma("zvaigzne", "V", "Priekšmets", "Ietver nosaukto"),
    lemma("pūst", "V", "Būt procesā", "Process"),
    lemma("riebt", "V", "Būt stāvoklī", "Stāvoklis"),
    lemma("medicīna", "V", "Abstrakts nojēgums", "Saistīts ar nosaukto"),
    lemma("skriet", "V", "Darīt", "Darītājs (dzīvs)"),
    lemma("ideja", "V", "Abstrakts nojēgums", "Saistīts ar nosaukto"),
    lemma("nest", "I", "Darīt", "Darbība"),
    lemma("iet", "I", "Būt procesā", "Process"),
    lemma("ir", "I", "Būt stāvoklī", "Stāvoklis"),
    lemma("atklusināt", "J", "Darīt", "Instruments"),
    lemma("sejauts", "J", "Priekšmets", "Ietver nosaukto"),
    lemma("telpiskot", "J", "Būt procesā", "Process"),
    lemma("sliecināt", "J", "Būt stāvoklī", "Stāvoklis"),
    lemma("aizstājeklis", "J", "Abstrakts nojēgums", "Saistīts ar nosaukto"),
    // The target label here is abbreviated and matches no catalog entry, so
    // the lemma gets no few-shot examples in the direct experiment.
    lemma("tērbstīt", "N", "Darīt", "Vieta (lietv)"),
    lemma("plakstule", "N", "Priekšmets", "Ietver nosaukto"),
    lemma("glimžēt", "N", "Būt procesā", "Process"),
    lemma("skurpelīgs", "N", "Būt stāvoklī", "Stāvoklis"),
    lemma("zvilgsme", "N", "Abstrakts nojēgums", "Saistīts ar nosaukto"),
];

/// Look up a category by its (source, target) key.
pub fn find_transformation(
    catalog: &[TransformationCategory],
    source: &str,
    target: &str,
) -> Option<TransformationCategory> {
    catalog
        .iter()
        .find(|t| t.source == source && t.target == target)
        .copied()
}

/// Examples for (source, target), or an empty list when the key is unknown.
pub fn examples_for(
    catalog: &[TransformationCategory],
    source: &str,
    target: &str,
) -> &'static [(&'static str, &'static str)] {
    find_transformation(catalog, source, target)
        .map(|t| t.examples)
        .unwrap_or(&[])
}
