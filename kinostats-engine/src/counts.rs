use serde::Serialize;
use std::collections::BTreeMap;

/// Un compteur par numéro de 1 à `max_num`, sans trou, indexé par la valeur du numéro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NumberCounts {
    counts: BTreeMap<u8, u32>,
}

/// Nombre d'apparitions de chaque numéro dans une fenêtre.
pub type FrequencyVector = NumberCounts;
/// Retard de chaque numéro (tirages écoulés depuis sa dernière sortie).
pub type StreakVector = NumberCounts;

impl NumberCounts {
    pub fn zeroed(max_num: u8) -> Self {
        Self {
            counts: (1..=max_num).map(|n| (n, 0)).collect(),
        }
    }

    /// `None` hors de la plage 1..=max_num.
    pub fn get(&self, number: u8) -> Option<u32> {
        self.counts.get(&number).copied()
    }

    /// Ignore les numéros hors plage.
    pub(crate) fn increment(&mut self, number: u8) {
        if let Some(count) = self.counts.get_mut(&number) {
            *count += 1;
        }
    }

    pub(crate) fn set(&mut self, number: u8, value: u32) {
        if let Some(count) = self.counts.get_mut(&number) {
            *count = value;
        }
    }

    /// Parcourt les numéros par ordre croissant.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts.iter().map(|(&n, &c)| (n, c))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn max_num(&self) -> u8 {
        self.counts.keys().next_back().copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }
}
