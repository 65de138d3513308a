//! Budget-based school matching.
//!
//! A school qualifies when it offers one of the requested boards, charges a
//! fee for the requested class, and that fee is at least 75% of the budget.
//! Its score comes from the narrowest budget window containing the fee.

use crate::model::school::{MatchQuery, School, SchoolMatch};
use std::cmp::Ordering;

/// `(± percent of budget, match percentage)`, narrowest first.
pub const MATCH_WINDOWS: [(u64, u8); 5] = [(25, 100), (50, 80), (75, 60), (100, 40), (125, 20)];

/// Ranked matches: the top 3 when at least three schools qualify, otherwise
/// only the single best one. Input is assumed validated (positive budget,
/// at least one board, non-blank class).
pub fn match_schools(query: &MatchQuery, catalog: &[School]) -> Vec<SchoolMatch> {
    let mut matches: Vec<SchoolMatch> = catalog
        .iter()
        .filter(|school| query.boards.iter().any(|b| school.offers_board(b)))
        .filter_map(|school| {
            let school_budget = school.fee_for(&query.class_level)?;
            if below_floor(query.budget, school_budget) {
                return None;
            }
            let match_percentage = window_score(query.budget, school_budget)?;
            Some(SchoolMatch {
                school: school.clone(),
                school_budget,
                match_percentage,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.match_percentage
            .cmp(&a.match_percentage)
            .then_with(|| by_ranking(a.school.ranking, b.school.ranking))
    });

    let keep = if matches.len() >= 3 { 3 } else { 1 };
    matches.truncate(keep);
    matches
}

/// Fees under 75% of the budget are never offered.
fn below_floor(budget: u64, school_budget: u64) -> bool {
    u128::from(school_budget) * 4 < u128::from(budget) * 3
}

pub fn window_score(budget: u64, school_budget: u64) -> Option<u8> {
    let diff = u128::from(budget.abs_diff(school_budget));
    MATCH_WINDOWS
        .iter()
        .find(|(percent, _)| diff * 100 <= u128::from(budget) * u128::from(*percent))
        .map(|(_, score)| *score)
}

fn by_ranking(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
