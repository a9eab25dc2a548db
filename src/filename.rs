use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

/// What the capture groups of a filename rule mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutput {
    /// Group 1 is the cnum, group 2 the start page (an end page, when the
    /// pattern has one, is matched but discarded).
    CnumAndStartPage,
    /// Group 1 is the cnum of a whole proceedings volume.
    CnumProceedings,
    /// Group 1 is the filename stem, kept as an opaque identifier.
    Garbage,
}

/// One entry of the ordered filename rule table.
pub struct FilenameRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub output: RuleOutput,
}

// Filenames are assumed whitespace-free; the rules do no trimming.
static FILE_RULES: Lazy<Vec<FilenameRule>> = Lazy::new(|| {
    vec![
        // Example: Pages_from_C88-01-23_15-24.pdf
        FilenameRule {
            name: "cnum and page range with prefix but take only start page",
            pattern: Regex::new(r"^Pages_from_(C\d\d-\d\d-\d\d)[-_](\d+)-\d+\.pdfa?$")
                .expect("invalid filename rule pattern"),
            output: RuleOutput::CnumAndStartPage,
        },
        // Example: Pages_from_C75-03-02_101.pdf
        FilenameRule {
            name: "cnum and page start with prefix with optional dot",
            pattern: Regex::new(r"^Pages_from_(C\d\d-\d\d-\d\d?.?\d)[-_](\d+)\.pdfa?$")
                .expect("invalid filename rule pattern"),
            output: RuleOutput::CnumAndStartPage,
        },
        // Example: Pages_from_C88-03-06.1_79-89.pdf
        FilenameRule {
            name: "cnum and page range with prefix but take only start page with optional dot",
            pattern: Regex::new(r"^Pages_from_(C\d\d-\d\d-\d\d?.?\d)[-_](\d+)-\d+\.pdfa?$")
                .expect("invalid filename rule pattern"),
            output: RuleOutput::CnumAndStartPage,
        },
        // Example: C73-03-04_Proceedings.pdf
        FilenameRule {
            name: "cnum with Proceedings suffixed with optional dot",
            pattern: Regex::new(r"^(C\d\d-\d\d-\d\d?.?\d)[-_]Proceedings\.pdfa?$")
                .expect("invalid filename rule pattern"),
            output: RuleOutput::CnumProceedings,
        },
        // Example: anything.pdf
        FilenameRule {
            name: "garbage",
            pattern: Regex::new(r"(?i)^(.+)\.pdfa?$").expect("invalid filename rule pattern"),
            output: RuleOutput::Garbage,
        },
    ]
});

/// Result of classifying one bare filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameMatch {
    Paper { cnum: String, fpage: String },
    Proceedings { cnum: String },
    Garbage { stem: String },
}

/// Classify a bare filename against the ordered rule table.
///
/// Rules are tried strictly in declaration order and the first match wins.
/// The final catch-all accepts any `.pdf`/`.pdfa` name, so a filename that
/// fits no convention still yields a usable (if opaque) identifier instead
/// of an error. Names without a pdf suffix at all (which the directory walk
/// never produces) degrade to a garbage match on the whole name, keeping the
/// classifier total.
pub fn classify(filename: &str) -> FilenameMatch {
    for rule in FILE_RULES.iter() {
        let Some(caps) = rule.pattern.captures(filename) else {
            continue;
        };
        let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default();
        info!("Recognised {}", rule.name);
        let matched = match rule.output {
            RuleOutput::CnumAndStartPage => {
                let (cnum, fpage) = (group(1), group(2));
                info!("cnum: {} fpage: {}", cnum, fpage);
                FilenameMatch::Paper { cnum, fpage }
            }
            RuleOutput::CnumProceedings => {
                let cnum = group(1);
                info!("cnum: {} (proceedings volume)", cnum);
                FilenameMatch::Proceedings { cnum }
            }
            RuleOutput::Garbage => FilenameMatch::Garbage { stem: group(1) },
        };
        return matched;
    }
    log::warn!("No known pattern for {}", filename);
    FilenameMatch::Garbage {
        stem: filename.to_string(),
    }
}
