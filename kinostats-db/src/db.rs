use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{format_timestamp, parse_numbers, parse_timestamp, validate_draw, Draw};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kino_draws (
    drawn_at  TEXT PRIMARY KEY,
    draw_id   TEXT,
    nums      TEXT NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("kinostats.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// Insère un tirage ; `false` si un tirage existe déjà à cet horodatage.
pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO kino_draws (drawn_at, draw_id, nums) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            format_timestamp(&draw.drawn_at),
            draw.draw_id,
            draw.numbers.to_storage(),
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

/// Historique du plus récent au plus ancien. Les lignes illisibles ou hors
/// plage (1-`max_num`) sont ignorées avec un avertissement.
pub fn fetch_history(conn: &Connection, limit: Option<u32>, max_num: u8) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT drawn_at, draw_id, nums FROM kino_draws ORDER BY drawn_at DESC LIMIT ?1"
    )?;
    // LIMIT -1 = pas de limite en SQLite
    let limit = limit.map(i64::from).unwrap_or(-1);
    let rows = stmt.query_map([limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?.collect::<Result<Vec<_>, _>>()?;

    let mut draws = Vec::with_capacity(rows.len());
    for (drawn_at, draw_id, nums) in rows {
        match parse_row(&drawn_at, &nums, max_num) {
            Ok(mut draw) => {
                draw.draw_id = draw_id;
                draws.push(draw);
            }
            Err(e) => log::warn!("Tirage {} ignoré : {:#}", drawn_at, e),
        }
    }
    Ok(draws)
}

fn parse_row(drawn_at: &str, nums: &str, max_num: u8) -> Result<Draw> {
    let drawn_at = parse_timestamp(drawn_at)?;
    let numbers = parse_numbers(nums)?;
    validate_draw(&numbers, max_num)?;
    Ok(Draw::new(drawn_at, numbers))
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM kino_draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KINO_MAX_NUM;

    fn test_draw(ts: &str, numbers: &[u8]) -> Draw {
        Draw::new(parse_timestamp(ts).unwrap(), numbers.iter().copied())
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw("2024-01-01 10:00", &[1, 2, 3])).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let inserted = insert_draw(&conn, &test_draw("2024-01-01 10:00", &[1, 2, 3])).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw("2024-01-01 10:00", &[4, 5, 6])).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_newest_first() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw("2024-01-01 10:00", &[1])).unwrap();
        insert_draw(&conn, &test_draw("2024-01-01 10:10", &[2])).unwrap();
        insert_draw(&conn, &test_draw("2024-01-01 10:05", &[3])).unwrap();

        let draws = fetch_history(&conn, None, KINO_MAX_NUM).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].numbers.numbers(), &[2]);
        assert_eq!(draws[1].numbers.numbers(), &[3]);
        assert_eq!(draws[2].numbers.numbers(), &[1]);
    }

    #[test]
    fn test_fetch_limit() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        for m in 0..5 {
            insert_draw(&conn, &test_draw(&format!("2024-01-01 10:0{m}"), &[m + 1])).unwrap();
        }
        let draws = fetch_history(&conn, Some(2), KINO_MAX_NUM).unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].numbers.numbers(), &[5]);
    }

    #[test]
    fn test_fetch_skips_invalid_rows() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        insert_draw(&conn, &test_draw("2024-01-01 10:00", &[1, 2])).unwrap();
        conn.execute(
            "INSERT INTO kino_draws (drawn_at, draw_id, nums) VALUES ('2024-01-01 10:05', NULL, '1,99')",
            [],
        ).unwrap();
        conn.execute(
            "INSERT INTO kino_draws (drawn_at, draw_id, nums) VALUES ('pas une date', NULL, '1,2')",
            [],
        ).unwrap();

        let draws = fetch_history(&conn, None, KINO_MAX_NUM).unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].numbers.numbers(), &[1, 2]);
    }

    #[test]
    fn test_draw_id_roundtrip() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let draw = test_draw("2024-01-01 10:00", &[7, 8]).with_id("1102345");
        insert_draw(&conn, &draw).unwrap();
        let draws = fetch_history(&conn, None, KINO_MAX_NUM).unwrap();
        assert_eq!(draws[0], draw);
    }
}
