use serde::Serialize;
use std::borrow::Cow;

use kinostats_db::models::Draw;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Pas de tirage en direct (source désactivée ou en échec).
    NoCandidate,
    /// Tirage en direct plus récent que l'historique, ajouté en tête.
    Prepended,
    /// Tirage en direct déjà en base ou plus ancien.
    Stale,
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeOutcome::NoCandidate => write!(f, "aucun tirage en direct"),
            MergeOutcome::Prepended => write!(f, "tirage en direct ajouté"),
            MergeOutcome::Stale => write!(f, "tirage en direct déjà connu"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Merged<'a> {
    pub history: Cow<'a, [Draw]>,
    pub outcome: MergeOutcome,
}

/// Ajoute `candidate` en tête de `history` s'il est strictement plus récent
/// que `history[0]`. L'historique d'origine n'est jamais modifié ; il n'est
/// copié que si le candidat est retenu. Sur un historique vide, tout candidat
/// est retenu.
pub fn merge(history: &[Draw], candidate: Option<Draw>) -> Merged<'_> {
    let Some(candidate) = candidate else {
        return Merged {
            history: Cow::Borrowed(history),
            outcome: MergeOutcome::NoCandidate,
        };
    };

    let newer = history
        .first()
        .map_or(true, |latest| candidate.drawn_at > latest.drawn_at);

    if !newer {
        log::debug!("Tirage en direct du {} ignoré (déjà en base)", candidate.drawn_at);
        return Merged {
            history: Cow::Borrowed(history),
            outcome: MergeOutcome::Stale,
        };
    }

    log::debug!("Tirage en direct du {} ajouté à l'historique", candidate.drawn_at);
    let mut merged = Vec::with_capacity(history.len() + 1);
    merged.push(candidate);
    merged.extend_from_slice(history);
    Merged {
        history: Cow::Owned(merged),
        outcome: MergeOutcome::Prepended,
    }
}
