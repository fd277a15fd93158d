use serde::Serialize;
use std::collections::BTreeSet;

use kinostats_db::models::{Draw, DrawTimestamp};

use crate::config::StatsConfig;
use crate::counts::{FrequencyVector, StreakVector};
use crate::frequency::{count, count_all};
use crate::merge::{merge, MergeOutcome};
use crate::ranking::top;
use crate::streak::streak;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowMetrics {
    pub window: usize,
    /// `min(window, nombre de tirages)` : plafond du retard.
    pub effective_window: usize,
    pub frequency: u32,
    pub streak: u32,
}

impl WindowMetrics {
    /// Vrai si le numéro n'est sorti dans aucun tirage de la fenêtre.
    pub fn absent_from_window(&self) -> bool {
        self.effective_window > 0 && self.streak as usize >= self.effective_window
    }
}

/// Une ligne de tableau : fréquence de classement puis métriques par fenêtre d'affichage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub number: u8,
    pub frequency: u32,
    pub recent: Vec<WindowMetrics>,
}

impl RankedEntry {
    /// Métriques de la fenêtre d'affichage principale.
    pub fn primary(&self) -> Option<&WindowMetrics> {
        self.recent.first()
    }

    pub fn recent_frequency(&self) -> u32 {
        self.primary().map_or(0, |m| m.frequency)
    }

    pub fn streak(&self) -> u32 {
        self.primary().map_or(0, |m| m.streak)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub draws_considered: usize,
    pub latest_draw: Option<DrawTimestamp>,
    /// Fenêtre effective du classement.
    pub ranking_window: usize,
    pub display_windows: Vec<usize>,
    pub top: Vec<RankedEntry>,
    /// Numéros hors top-N, par ordre croissant.
    pub others: Vec<RankedEntry>,
    /// Fréquences sur la fenêtre d'affichage principale.
    pub display_frequency: FrequencyVector,
    pub live: MergeOutcome,
}

struct WindowStats {
    window: usize,
    freq: FrequencyVector,
    streaks: StreakVector,
}

/// Fusionne le tirage en direct éventuel puis calcule le rapport.
pub fn compute(history: &[Draw], candidate: Option<Draw>, config: &StatsConfig) -> StatsReport {
    let merged = merge(history, candidate);
    let mut report = build_report(&merged.history, config);
    report.live = merged.outcome;
    report
}

/// Calcule le rapport sur un historique déjà fusionné (plus récent en tête).
pub fn build_report(history: &[Draw], config: &StatsConfig) -> StatsReport {
    let max_num = config.max_num;
    let (ranking_window, ranking_freq) = match config.ranking_window {
        Some(w) => (w.min(history.len()), count(history, w, max_num)),
        None => (history.len(), count_all(history, max_num)),
    };

    let windows: Vec<WindowStats> = config
        .display_windows
        .iter()
        .map(|&window| WindowStats {
            window,
            freq: count(history, window, max_num),
            streaks: streak(history, window, max_num),
        })
        .collect();

    let row = |number: u8, frequency: u32| RankedEntry {
        number,
        frequency,
        recent: windows
            .iter()
            .map(|w| WindowMetrics {
                window: w.window,
                effective_window: w.window.min(history.len()),
                frequency: w.freq.get(number).unwrap_or(0),
                streak: w.streaks.get(number).unwrap_or(0),
            })
            .collect(),
    };

    let top_rows: Vec<RankedEntry> = top(&ranking_freq, config.top_n)
        .into_iter()
        .map(|e| row(e.number, e.frequency))
        .collect();

    let in_top: BTreeSet<u8> = top_rows.iter().map(|r| r.number).collect();
    let others: Vec<RankedEntry> = ranking_freq
        .iter()
        .filter(|(n, _)| !in_top.contains(n))
        .map(|(n, f)| row(n, f))
        .collect();

    let display_frequency = match windows.first() {
        Some(w) => w.freq.clone(),
        None => count(history, 0, max_num),
    };

    log::debug!(
        "Rapport : {} tirages, classement sur {}, top {}",
        history.len(),
        ranking_window,
        top_rows.len()
    );

    StatsReport {
        draws_considered: history.len(),
        latest_draw: history.first().map(|d| d.drawn_at),
        ranking_window,
        display_windows: config.display_windows.clone(),
        top: top_rows,
        others,
        display_frequency,
        live: MergeOutcome::NoCandidate,
    }
}
