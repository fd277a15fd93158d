//! Statistiques glissantes sur un historique de tirages Kino.
//!
//! Toutes les fonctions prennent l'historique du plus récent au plus ancien
//! (`history[0]` = dernier tirage) et ne font aucune entrée/sortie.

pub mod config;
pub mod counts;
pub mod frequency;
pub mod merge;
pub mod ranking;
pub mod report;
pub mod streak;

pub use config::{ConfigError, StatsConfig};
pub use counts::{FrequencyVector, NumberCounts, StreakVector};
pub use merge::{merge, MergeOutcome, Merged};
pub use ranking::{top, TopEntry};
pub use report::{build_report, compute, RankedEntry, StatsReport, WindowMetrics};
