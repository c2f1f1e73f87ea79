// Gender partition and special-character screening.
//
// Both operations are read-only passes over the typed batch. The partition
// feeds the similarity scorer; the screening list feeds record annotation
// and reporting.

use crate::roster::models::{Gender, StudentRecord};

/// Punctuation tolerated in a clean display name besides ASCII letters and
/// whitespace. The source sheets use "Last, First" ordering, so the comma
/// is not worth flagging.
pub const DEFAULT_ALLOWED_PUNCTUATION: &[char] = &[','];

/// Split the batch into male and female display-name lists, preserving
/// batch order. Records with an unrecognized gender cell land in neither.
pub fn gender_partition(records: &[StudentRecord]) -> (Vec<String>, Vec<String>) {
    let mut male = Vec::new();
    let mut female = Vec::new();

    for record in records {
        match record.gender {
            Gender::Male => male.push(record.name.clone()),
            Gender::Female => female.push(record.name.clone()),
            Gender::Unrecognized => {}
        }
    }

    (male, female)
}

/// A name is flagged when any character is outside ASCII letters,
/// whitespace, and the allowed punctuation set.
pub fn has_special_characters(name: &str, allowed: &[char]) -> bool {
    name.chars()
        .any(|c| !(c.is_ascii_alphabetic() || c.is_whitespace() || allowed.contains(&c)))
}

/// Ordered list of display names that trip the special-character screen.
pub fn special_character_names(records: &[StudentRecord], allowed: &[char]) -> Vec<String> {
    records
        .iter()
        .filter(|r| has_special_characters(&r.name, allowed))
        .map(|r| r.name.clone())
        .collect()
}
