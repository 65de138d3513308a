use crate::model::lead::Lead;
use std::cmp::Ordering;

/// Newest first; leads with a missing or unparsable date go last.
/// The sort is stable, so equal dates keep their relative order.
pub fn sort_newest_first(leads: &mut [Lead]) {
    leads.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
