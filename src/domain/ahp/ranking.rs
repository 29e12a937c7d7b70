//! Ranker - Total ordering of scored rooms with competition ranking.
//!
//! Rooms with numerically indistinguishable scores share a rank, and the
//! next distinct score resumes at 1 + the number of rooms ahead of it
//! (1, 1, 3, 4, ...).

use std::fmt::Write;

use super::criteria::{Criterion, MainCriterion};
use super::result::ScoredRoom;

/// Absolute part of the tie tolerance.
const TIE_ABS_TOLERANCE: f64 = 1e-9;

/// Relative part of the tie tolerance.
const TIE_REL_TOLERANCE: f64 = 1e-7;

/// Rooms always shown with their main-criterion breakdown.
const BREAKDOWN_RANKS: usize = 3;

/// True when two final scores are indistinguishable for ranking.
pub fn scores_tied(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIE_ABS_TOLERANCE + TIE_REL_TOLERANCE * b.abs()
}

pub struct Ranker;

impl Ranker {
    /// Sorts descending by final score and assigns competition ranks.
    ///
    /// The sort is stable, so tied rooms keep their input order.
    pub fn rank(mut rooms: Vec<ScoredRoom>) -> Vec<ScoredRoom> {
        rooms.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

        let scores: Vec<f64> = rooms.iter().map(|r| r.final_score).collect();
        for (room, rank) in rooms.iter_mut().zip(Self::competition_ranks(&scores)) {
            room.rank = rank;
        }
        rooms
    }

    /// Competition ranks for scores already sorted descending.
    ///
    /// Each score is compared with its predecessor.
    pub fn competition_ranks(sorted_scores: &[f64]) -> Vec<usize> {
        let mut ranks = Vec::with_capacity(sorted_scores.len());
        let mut current = 1;
        for (i, score) in sorted_scores.iter().enumerate() {
            if i > 0 && !scores_tied(*score, sorted_scores[i - 1]) {
                current = i + 1;
            }
            ranks.push(current);
        }
        ranks
    }
}

/// Renders ranked rooms as a text report.
///
/// The main-criterion breakdown is shown for the top three ranks, and for
/// every room when `detailed` is set.
pub fn format_ranking(rankings: &[ScoredRoom], detailed: bool) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();
    let _ = writeln!(out, "{}\nROOM RANKING RESULTS\n{}\n", rule, rule);

    for room in rankings {
        let _ = writeln!(out, "Rank {}: {}", room.rank, room.room_name);
        let _ = writeln!(
            out,
            "   Final Score: {:.4} ({:.1}%)",
            room.final_score,
            room.final_score * 100.0
        );

        if detailed || room.rank <= BREAKDOWN_RANKS {
            let last = MainCriterion::ALL.len() - 1;
            for (i, main) in MainCriterion::ALL.iter().enumerate() {
                let branch = if i == last { "└─" } else { "├─" };
                let label = format!("{}:", main.name());
                let _ = writeln!(
                    out,
                    "   {} {:<10} {:.3}",
                    branch,
                    label,
                    room.main_score(*main)
                );
            }
        }
        out.push('\n');
    }

    out
}
