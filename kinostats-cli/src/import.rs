use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use kinostats_db::rusqlite::Connection;
use std::path::Path;

use kinostats_db::db::insert_draw;
use kinostats_db::models::{parse_timestamp, validate_draw, Draw};

/// Ligne CSV : `draw_id;drawn_at;n1;n2;...` (draw_id peut être vide).
fn parse_record(record: &csv::StringRecord, max_num: u8) -> Result<Draw> {
    let draw_id = field(record, 0)?;
    let drawn_at = parse_timestamp(field(record, 1)?)?;

    let numbers = record
        .iter()
        .skip(2)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .with_context(|| format!("Impossible de parser '{}'", s))
        })
        .collect::<Result<Vec<u8>>>()?;
    validate_draw(&numbers, max_num)?;

    let draw = Draw::new(drawn_at, numbers);
    Ok(if draw_id.is_empty() { draw } else { draw.with_id(draw_id) })
}

fn field(record: &csv::StringRecord, idx: usize) -> Result<&str> {
    record
        .get(idx)
        .map(str::trim)
        .with_context(|| format!("Champ manquant à l'index {}", idx))
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path, max_num: u8) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let records: Vec<csv::Result<csv::StringRecord>> = reader.records().collect();

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len}")
            .context("Modèle de barre de progression invalide")?
            .progress_chars("=> "),
    );

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in records {
        result.total_records += 1;
        pb.inc(1);
        let parsed = record_result
            .context("Erreur lecture")
            .and_then(|record| parse_record(&record, max_num));
        match parsed {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    log::warn!("Erreur insertion ligne {}: {:#}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                log::warn!("Ligne {} ignorée : {:#}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    pb.finish_and_clear();
    tx.commit().context("Échec du commit")?;
    Ok(result)
}
