use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Plage des numéros Kino (1-80).
pub const KINO_MAX_NUM: u8 = 80;
/// Nombre de numéros tirés à chaque tirage Kino.
pub const KINO_PICK_COUNT: usize = 20;

/// Horodatage d'un tirage, heure locale de l'opérateur, sans fuseau.
pub type DrawTimestamp = NaiveDateTime;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_timestamp(raw: &str) -> Result<DrawTimestamp> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .with_context(|| format!("Horodatage invalide: '{}'", raw))
}

pub fn format_timestamp(ts: &DrawTimestamp) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

/// Numéros d'un tirage, triés par ordre croissant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSet(Vec<u8>);

impl DrawSet {
    pub fn new(numbers: impl IntoIterator<Item = u8>) -> Self {
        let mut numbers: Vec<u8> = numbers.into_iter().collect();
        numbers.sort_unstable();
        Self(numbers)
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }

    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Forme stockée en base : "1,7,23,80".
    pub fn to_storage(&self) -> String {
        self.0
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub draw_id: Option<String>,
    pub drawn_at: DrawTimestamp,
    pub numbers: DrawSet,
}

impl Draw {
    pub fn new(drawn_at: DrawTimestamp, numbers: impl IntoIterator<Item = u8>) -> Self {
        Self {
            draw_id: None,
            drawn_at,
            numbers: DrawSet::new(numbers),
        }
    }

    pub fn with_id(mut self, draw_id: impl Into<String>) -> Self {
        self.draw_id = Some(draw_id.into());
        self
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(number)
    }
}

/// Parse une liste de numéros stockée ("1,2,3") ou au format tableau Postgres ("{1,2,3}").
pub fn parse_numbers(raw: &str) -> Result<Vec<u8>> {
    let trimmed = raw.trim().trim_start_matches(['{', '[']).trim_end_matches(['}', ']']);
    if trimmed.trim().is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split([',', ' ', ';'])
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim()
                .parse::<u8>()
                .with_context(|| format!("Numéro invalide: '{}'", s))
        })
        .collect()
}

pub fn validate_draw(numbers: &[u8], max_num: u8) -> Result<()> {
    if numbers.is_empty() {
        bail!("Tirage vide");
    }
    for &n in numbers {
        if n < 1 || n > max_num {
            bail!("Numéro {} hors limites (1-{})", n, max_num);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}
