use kinostats_db::models::Draw;

use crate::counts::{FrequencyVector, NumberCounts};

/// Fréquence de chaque numéro sur les `window` tirages les plus récents.
///
/// `history[0]` est le tirage le plus récent ; la fenêtre effective est
/// `min(window, history.len())`. Un historique vide donne un vecteur nul.
pub fn count(history: &[Draw], window: usize, max_num: u8) -> FrequencyVector {
    let mut freq = NumberCounts::zeroed(max_num);
    for draw in history.iter().take(window) {
        for &n in draw.numbers.numbers() {
            freq.increment(n);
        }
    }
    freq
}

/// Fréquence sur tout l'historique.
pub fn count_all(history: &[Draw], max_num: u8) -> FrequencyVector {
    count(history, history.len(), max_num)
}
