use kinostats_db::models::Draw;

use crate::counts::{NumberCounts, StreakVector};

/// Retard de chaque numéro dans la fenêtre des `window` tirages les plus récents.
///
/// On parcourt du plus récent au plus ancien et on s'arrête à la première
/// sortie du numéro. Un numéro absent de toute la fenêtre a un retard égal à
/// la fenêtre effective, jamais plus : les retards restent comparables entre
/// numéros pour une fenêtre donnée.
pub fn streak(history: &[Draw], window: usize, max_num: u8) -> StreakVector {
    let recent = &history[..window.min(history.len())];
    let mut streaks = NumberCounts::zeroed(max_num);

    for n in 1..=max_num {
        let gap = recent
            .iter()
            .position(|draw| draw.contains(n))
            .unwrap_or(recent.len());
        streaks.set(n, gap as u32);
    }

    streaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scenario_history, ts};

    #[test]
    fn test_scenario_streaks() {
        let streaks = streak(&scenario_history(), 3, 5);
        let got: Vec<(u8, u32)> = streaks.iter().collect();
        assert_eq!(got, vec![(1, 0), (2, 0), (3, 1), (4, 2), (5, 2)]);
    }

    #[test]
    fn test_absent_number_capped_at_window() {
        let history = vec![
            Draw::new(ts(3), [1]),
            Draw::new(ts(2), [1]),
            Draw::new(ts(1), [5]),
        ];
        let streaks = streak(&history, 2, 5);
        // 5 sort au 3e tirage, hors fenêtre : plafonné à 2
        assert_eq!(streaks.get(5), Some(2));
        assert_eq!(streaks.get(3), Some(2));
        assert_eq!(streaks.get(1), Some(0));
    }

    #[test]
    fn test_cap_is_effective_window() {
        let history = vec![Draw::new(ts(1), [1])];
        let streaks = streak(&history, 196, 5);
        assert_eq!(streaks.get(2), Some(1));
    }

    #[test]
    fn test_empty_history() {
        let streaks = streak(&[], 196, 80);
        assert_eq!(streaks.len(), 80);
        assert!(streaks.iter().all(|(_, s)| s == 0));
    }
}
