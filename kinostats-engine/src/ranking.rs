use serde::Serialize;
use std::cmp::Ordering;

use crate::counts::FrequencyVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopEntry {
    pub number: u8,
    pub frequency: u32,
}

/// Fréquence décroissante, puis numéro croissant à égalité.
pub fn by_frequency_then_number(a: &TopEntry, b: &TopEntry) -> Ordering {
    b.frequency
        .cmp(&a.frequency)
        .then_with(|| a.number.cmp(&b.number))
}

/// Les `n` numéros les plus fréquents ; `min(n, max_num)` entrées.
pub fn top(freq: &FrequencyVector, n: usize) -> Vec<TopEntry> {
    let mut entries: Vec<TopEntry> = freq
        .iter()
        .map(|(number, frequency)| TopEntry { number, frequency })
        .collect();
    entries.sort_by(by_frequency_then_number);
    entries.truncate(n);
    entries
}
