use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Author, RawAuthor, Reference};

// Collaboration mention in a free-text citation fragment,
// e.g. "[CMS collaboration]".
static COLLABORATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*?\s*[\[\(]*(\w+)\s[cC]ollaboration.*")
        .expect("invalid collaboration pattern")
});

// Journal back-reference hidden in a "misc" fragment,
// e.g. "NI.M. 591, 453 (2008)".
static NIM_PUBSTRING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*NI.M.\s(\w*\d+),\s(\d+)\s\((\d+)\)").expect("invalid pubstring pattern")
});

/// Split a full name into (surname, given names).
///
/// A comma wins: "Doe, John" splits at the comma. Otherwise the name is
/// split on whitespace and `surname_first` decides which end holds the
/// surname.
pub fn split_fullname(fullname: &str, surname_first: bool) -> (String, String) {
    let fullname = fullname.trim();
    if fullname.is_empty() {
        return (String::new(), String::new());
    }
    if let Some((left, right)) = fullname.split_once(',') {
        return (left.trim().to_string(), right.trim().to_string());
    }
    let mut parts: Vec<&str> = fullname.split_whitespace().collect();
    let surname = if surname_first {
        parts.remove(0)
    } else {
        parts.pop().unwrap_or_default()
    };
    (surname.to_string(), parts.join(" "))
}

/// Normalize one extractor author into a display name plus affiliations.
///
/// Single-character given names are treated as initials and get a trailing
/// period. A surname mentioning "collaboration" is a pseudo-author and is
/// kept whole, with no given-names part. Returns `None` when every field is
/// empty; an author with only affiliations is retained.
pub fn normalize_author(raw: &RawAuthor) -> Option<Author> {
    let (surname, given_names) = split_fullname(raw.name.as_deref().unwrap_or(""), false);

    let name = if !surname.is_empty() && surname.to_lowercase().contains("collaboration") {
        surname
    } else if !surname.is_empty() && !given_names.is_empty() {
        let mut given_names = given_names;
        if given_names.chars().count() == 1 {
            given_names.push('.');
        }
        format!("{}, {}", surname, given_names)
    } else {
        surname
    };

    let affiliations: Vec<String> = raw
        .affiliations
        .iter()
        .filter_map(|aff| aff.value.as_deref())
        .map(|value| value.trim_matches(|c| c == '(' || c == ')').to_string())
        .filter(|value| !value.is_empty())
        .collect();

    if name.is_empty() && affiliations.is_empty() {
        return None;
    }
    Some(Author { name, affiliations })
}

/// Title-case a string: each alphabetic run starts uppercase, rest lowercase.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Extract the page locator from a page-range string.
///
/// "453-460" and "453" both yield "453"; non-digit characters in the start
/// component are discarded. This is the same rule for pages coming from
/// filenames and pages coming from catalog range strings.
pub fn fpage_from_range(range: &str) -> String {
    let start = range.split('-').next().unwrap_or(range);
    start.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Canonical journal title of a reference, with inner whitespace removed.
///
/// The shorthand "N.I.M." is expanded to the catalog spelling
/// "Nucl.Instrum.Meth." regardless of how the title got there.
pub fn canonical_journal_title(reference: &Reference) -> Option<String> {
    let title = reference.journal_title.first()?;
    if title == "N.I.M." {
        return Some("Nucl.Instrum.Meth.".to_string());
    }
    Some(title.split_whitespace().collect())
}

/// Clean one reference, recovering structure from its free-text fragments.
///
/// Filling is monotonic: fields that already hold a value are left alone.
/// The two literal overrides are the exception: a fragment containing the
/// exact string "Pierre Auger Collaboration" replaces the collaboration
/// unconditionally, and the N.I.M. journal canonicalization happens later in
/// `canonical_journal_title` regardless of origin. Both checks run per
/// fragment, in fragment order.
pub fn clean_reference(mut reference: Reference) -> Reference {
    for misc in &reference.misc {
        if reference.collaboration.is_none() && misc.to_lowercase().contains("collaboration") {
            if let Some(caps) = COLLABORATION_RE.captures(misc) {
                let mut collaboration = caps
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                if collaboration.contains("Auger") {
                    collaboration = "Pierre Auger".to_string();
                }
                reference.collaboration = Some(format!("{} Collaboration", collaboration));
            }
        }
        if misc.contains("Pierre Auger Collaboration") {
            reference.collaboration = Some("Pierre Auger Collaboration".to_string());
        }
        if misc.contains("NI.M.") && reference.journal_volume.is_empty() {
            if let Some(caps) = NIM_PUBSTRING_RE.captures(misc) {
                let (volume, fpage, year) = (&caps[1], &caps[2], &caps[3]);
                reference.journal_title = vec!["N.I.M.".to_string()];
                reference.journal_volume = vec![volume.to_string()];
                reference.journal_page = vec![fpage.to_string()];
                reference.year = vec![year.to_string()];
            }
        }
    }

    reference.reportnumber = reference
        .reportnumber
        .iter()
        .map(|number| normalize_report_number(number))
        .collect();

    reference
}

/// Canonicalize arXiv report numbers for the known category tags.
///
/// "1234.5678 [astro-ph]" becomes "arXiv:1234.5678"; numbers already
/// carrying an arXiv prefix, and numbers of other categories, pass through.
pub fn normalize_report_number(number: &str) -> String {
    for category in ["astro-ph", "hep-ph"] {
        if number.contains(category) {
            let stripped = number.replace(&format!(" [{}]", category), "");
            if stripped.contains("arXiv") {
                return stripped;
            }
            return format!("arXiv:{}", stripped);
        }
    }
    number.to_string()
}
