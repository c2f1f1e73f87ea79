// Unit tests for classification and fusion over typed batches.
//
// Exercises the gender partition totality property, the special-character
// screen against explicit allowed sets, and the raw-name fusion join.

use rollcall::roster::classify::{
    gender_partition, has_special_characters, special_character_names,
    DEFAULT_ALLOWED_PUNCTUATION,
};
use rollcall::roster::fuse::fuse;
use rollcall::roster::models::{Gender, SimilarityPair, StudentRecord};

fn record(name: &str, gender: Gender) -> StudentRecord {
    StudentRecord {
        student_id: String::new(),
        name: name.to_string(),
        gender,
        date_of_birth: None,
        email: None,
        has_special_characters: false,
        has_similar_name: false,
    }
}

fn pair(a: &str, b: &str, score: f64) -> SimilarityPair {
    SimilarityPair {
        name_a: a.to_string(),
        name_b: b.to_string(),
        score,
    }
}

// ============================================================
// Gender partition — totality
// ============================================================

#[test]
fn partition_is_total_over_recognized_categories() {
    let batch = vec![
        record("Adam", Gender::Male),
        record("Beth", Gender::Female),
        record("Pat", Gender::Unrecognized),
        record("Carl", Gender::Male),
        record("Drew", Gender::Unrecognized),
        record("Eve", Gender::Female),
    ];

    let (male, female) = gender_partition(&batch);
    let excluded = batch
        .iter()
        .filter(|r| r.gender == Gender::Unrecognized)
        .count();

    assert_eq!(male.len() + female.len() + excluded, batch.len());

    // Every name lands in exactly one group.
    for r in &batch {
        let in_male = male.contains(&r.name);
        let in_female = female.contains(&r.name);
        let membership = usize::from(in_male)
            + usize::from(in_female)
            + usize::from(r.gender == Gender::Unrecognized);
        assert_eq!(membership, 1, "{} must be in exactly one group", r.name);
    }
}

#[test]
fn partition_of_empty_batch_is_empty() {
    let (male, female) = gender_partition(&[]);
    assert!(male.is_empty());
    assert!(female.is_empty());
}

// ============================================================
// Special-character screen — explicit allowed sets
// ============================================================

#[test]
fn hyphen_outside_allowed_set_is_flagged() {
    assert!(has_special_characters("Jo-Ann", DEFAULT_ALLOWED_PUNCTUATION));
}

#[test]
fn comma_inside_allowed_set_is_not_flagged() {
    assert!(!has_special_characters("Jo, Ann", &[',']));
}

#[test]
fn comma_outside_allowed_set_is_flagged() {
    assert!(has_special_characters("Jo, Ann", &[]));
}

#[test]
fn screen_respects_a_widened_allowed_set() {
    assert!(!has_special_characters("Jo-Ann", &[',', '-']));
    assert!(has_special_characters("D'Angelo", &[',', '-']));
}

#[test]
fn screened_names_come_back_in_batch_order() {
    let batch = vec![
        record("Zoe-1", Gender::Female),
        record("Adam", Gender::Male),
        record("Bea+", Gender::Female),
    ];
    let flagged = special_character_names(&batch, DEFAULT_ALLOWED_PUNCTUATION);
    assert_eq!(flagged, vec!["Zoe-1", "Bea+"]);
}

// ============================================================
// Fusion — raw-name join
// ============================================================

#[test]
fn similarity_flag_set_for_either_pair_member() {
    let batch = fuse(
        vec![
            record("John Smith", Gender::Male),
            record("Jon Smith", Gender::Female),
            record("Unrelated", Gender::Male),
        ],
        vec![pair("John Smith", "Jon Smith", 0.92)],
    );

    assert!(batch.records[0].has_similar_name);
    assert!(batch.records[1].has_similar_name);
    assert!(!batch.records[2].has_similar_name);
}

#[test]
fn join_does_not_normalize_names() {
    // The scorer was handed raw names, so the join must be exact:
    // a record differing only in case or spacing stays unflagged.
    let batch = fuse(
        vec![
            record("JOHN SMITH", Gender::Male),
            record("John  Smith", Gender::Male),
        ],
        vec![pair("John Smith", "Jon Smith", 0.92)],
    );
    assert!(batch.records.iter().all(|r| !r.has_similar_name));
}

#[test]
fn record_in_multiple_pairs_is_flagged_once() {
    let batch = fuse(
        vec![record("John Smith", Gender::Male)],
        vec![
            pair("John Smith", "Jon Smith", 0.92),
            pair("John Smith", "Joan Smith", 0.88),
        ],
    );
    assert!(batch.records[0].has_similar_name);
    assert_eq!(batch.pairs.len(), 2);
}
