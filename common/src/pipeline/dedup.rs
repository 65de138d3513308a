use crate::model::lead::{IdentityKey, Lead};
use std::collections::HashMap;

/// Collapses leads sharing an identity key into the most recent one.
///
/// The first lead seen for a key is kept unless a later one carries a
/// strictly later date; an unparsable date on either side never wins.
/// Output follows the order in which keys were first seen.
pub fn dedup_leads<I>(leads: I) -> Vec<Lead>
where
    I: IntoIterator<Item = Lead>,
{
    let mut order: Vec<IdentityKey> = Vec::new();
    let mut best: HashMap<IdentityKey, Lead> = HashMap::new();

    for lead in leads {
        let key = lead.identity_key();
        match best.get(&key) {
            None => {
                order.push(key.clone());
                best.insert(key, lead);
            }
            Some(current) => {
                if is_later(&lead, current) {
                    best.insert(key, lead);
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| best.remove(&key))
        .collect()
}

fn is_later(candidate: &Lead, current: &Lead) -> bool {
    match (candidate.parsed_date(), current.parsed_date()) {
        (Some(candidate), Some(current)) => candidate > current,
        _ => false,
    }
}
