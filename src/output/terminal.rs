// Colored terminal output for batch summaries and the ranked pair list.
//
// This module handles all terminal-specific formatting; the main.rs
// display paths delegate here.

use colored::Colorize;

use crate::roster::models::{AnnotatedBatch, SimilarityPair};

/// Display the ranked cross-group similarity list.
pub fn display_similarity_list(pairs: &[SimilarityPair]) {
    if pairs.is_empty() {
        println!("No name pairs at or above the similarity threshold.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Similar Names ({} pairs) ===", pairs.len()).bold()
    );
    println!();

    println!(
        "  {:>4}  {:<28} {:<28} {:>6}",
        "Rank".dimmed(),
        "Name A".dimmed(),
        "Name B".dimmed(),
        "Score".dimmed(),
    );
    println!("  {}", "-".repeat(70).dimmed());

    for (i, pair) in pairs.iter().enumerate() {
        let score = format!("{:>6.3}", pair.score);
        let colored_score = if pair.score >= 0.8 {
            score.red().to_string()
        } else if pair.score >= 0.65 {
            score.yellow().to_string()
        } else {
            score.normal().to_string()
        };

        println!(
            "  {:>4}. {:<28} {:<28} {}",
            i + 1,
            pair.name_a,
            pair.name_b,
            colored_score,
        );
    }
}

/// Display the fused batch summary: record count, assignment coverage, and
/// flag tallies.
pub fn display_batch_summary(batch: &AnnotatedBatch) {
    println!(
        "\n{}",
        format!("=== Roster Batch ({} records) ===", batch.records.len()).bold()
    );

    let assigned = batch.records.iter().filter(|r| r.email.is_some()).count();
    let special = batch
        .records
        .iter()
        .filter(|r| r.has_special_characters)
        .count();
    let similar = batch.records.iter().filter(|r| r.has_similar_name).count();

    println!("  Emails assigned: {assigned}");
    if special > 0 {
        println!(
            "  {} {} name(s) with special characters",
            "~".yellow(),
            special
        );
    }
    if similar > 0 {
        println!(
            "  {} {} record(s) in a cross-group similar-name pair",
            "!".red(),
            similar
        );
    }
    if special == 0 && similar == 0 {
        println!("  {} no flagged names", "ok".green());
    }
}
