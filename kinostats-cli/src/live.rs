use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use kinostats_db::models::{parse_timestamp, validate_draw, Draw, DrawTimestamp};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Erreur réseau : {0}")]
    Network(#[from] reqwest::Error),

    #[error("Impossible de lire {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Page de résultats inattendue : {0}")]
    Malformed(String),
}

/// Source du dernier tirage publié : capture locale ou page web.
#[derive(Debug, Clone)]
pub enum LiveSource {
    File(PathBuf),
    Url(String),
}

impl LiveSource {
    pub fn fetch(&self, pick_count: usize, max_num: u8) -> Result<Draw, FetchError> {
        let page = match self {
            LiveSource::File(path) => std::fs::read_to_string(path).map_err(|source| FetchError::Io {
                path: path.display().to_string(),
                source,
            })?,
            LiveSource::Url(url) => {
                let client = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(10))
                    .build()?;
                client.get(url).send()?.error_for_status()?.text()?
            }
        };
        parse_live_page(&page, pick_count, max_num)
    }
}

/// Un échec de la source en direct n'interrompt jamais le rapport : il est
/// journalisé et traité comme « pas de nouveau tirage ».
pub fn observe(source: Option<&LiveSource>, pick_count: usize, max_num: u8) -> Option<Draw> {
    let source = source?;
    match source.fetch(pick_count, max_num) {
        Ok(draw) => {
            log::info!("Tirage en direct observé : {}", draw.drawn_at);
            Some(draw)
        }
        Err(e) => {
            log::warn!("Tirage en direct indisponible ({:?}) : {}", source, e);
            None
        }
    }
}

/// Cherche le premier horodatage de la page puis exige `pick_count` numéros
/// juste après.
pub fn parse_live_page(page: &str, pick_count: usize, max_num: u8) -> Result<Draw, FetchError> {
    let text = strip_tags(page);
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '|'))
        .filter(|t| t.chars().any(|c| c.is_ascii_alphanumeric()))
        .collect();

    let (drawn_at, start) = find_timestamp(&tokens)
        .ok_or_else(|| FetchError::Malformed("aucun horodatage trouvé".to_string()))?;

    let end = start
        .checked_add(pick_count)
        .ok_or_else(|| FetchError::Malformed(format!("nombre de numéros invalide : {}", pick_count)))?;
    let raw = tokens.get(start..end).ok_or_else(|| {
        FetchError::Malformed(format!(
            "{} numéros attendus, {} trouvés",
            pick_count,
            tokens.len().saturating_sub(start)
        ))
    })?;

    let numbers = raw
        .iter()
        .map(|t| {
            t.parse::<u8>()
                .map_err(|_| FetchError::Malformed(format!("jeton non numérique '{}'", t)))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    validate_draw(&numbers, max_num).map_err(|e| FetchError::Malformed(e.to_string()))?;

    Ok(Draw::new(drawn_at, numbers))
}

/// Renvoie l'horodatage et l'index du premier jeton qui le suit.
fn find_timestamp(tokens: &[&str]) -> Option<(DrawTimestamp, usize)> {
    for i in 0..tokens.len() {
        if let Some(next) = tokens.get(i + 1) {
            if let Ok(ts) = parse_timestamp(&format!("{} {}", tokens[i], next)) {
                return Some((ts, i + 2));
            }
        }
        if let Ok(ts) = parse_timestamp(tokens[i]) {
            return Some((ts, i + 1));
        }
    }
    None
}

fn strip_tags(page: &str) -> String {
    let mut text = String::with_capacity(page.len());
    let mut in_tag = false;
    for c in page.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ")
}
