use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use textplots::Plot;

use crate::import::ImportResult;
use kinostats_db::models::{format_timestamp, Draw};
use kinostats_engine::{MergeOutcome, RankedEntry, StatsReport};

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Tirage", "Numéros"]);

    for draw in draws {
        let numbers_str = draw
            .numbers
            .numbers()
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" ");

        table.add_row(vec![
            format_timestamp(&draw.drawn_at),
            draw.draw_id.clone().unwrap_or_else(|| "—".to_string()),
            numbers_str,
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_report(report: &StatsReport) {
    println!("\n🎲 Statistiques Kino\n");
    match report.latest_draw {
        Some(ts) => println!(
            "{} tirages, dernier le {} ({})",
            report.draws_considered,
            format_timestamp(&ts),
            report.live
        ),
        None => println!("Aucun tirage en base ({})", report.live),
    }
    if report.live == MergeOutcome::Prepended {
        println!("Le tirage en direct n'est pas encore en base : il est inclus dans les calculs.");
    }

    println!(
        "\n── Top {} par fréquence (sur {} tirages) ──",
        report.top.len(),
        report.ranking_window
    );
    println!("{}", ranked_table(&report.top, &report.display_windows, true));

    println!("\n── Autres numéros ──");
    println!("{}", ranked_table(&report.others, &report.display_windows, false));
}

fn ranked_table(rows: &[RankedEntry], windows: &[usize], highlight: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec!["Numéro".to_string(), "Fréquence".to_string()];
    for w in windows {
        header.push(format!("Fréq. {w}"));
        header.push(format!("Retard {w}"));
    }
    table.set_header(header);

    for row in rows {
        let number = Cell::new(format!("{:2}", row.number));
        let mut cells = vec![
            if highlight { number.fg(Color::Green) } else { number },
            Cell::new(row.frequency),
        ];
        for metrics in &row.recent {
            cells.push(Cell::new(metrics.frequency));
            let streak = Cell::new(metrics.streak);
            cells.push(if metrics.absent_from_window() { streak.fg(Color::Red) } else { streak });
        }
        table.add_row(cells);
    }
    table
}

pub fn display_frequency_chart(report: &StatsReport) {
    let window = report.display_windows.first().copied().unwrap_or(0);
    println!(
        "\n── Fréquence sur les {} derniers tirages ({} numéros sortis) ──\n",
        window,
        report.display_frequency.total()
    );

    let points: Vec<(f32, f32)> = report
        .display_frequency
        .iter()
        .map(|(n, c)| (n as f32, c as f32))
        .collect();
    if points.is_empty() {
        println!("  (Pas de données à afficher)");
        return;
    }

    let x_max = report.display_frequency.max_num() as f32 + 1.0;
    let y_max = points.iter().map(|p| p.1).fold(0.0f32, f32::max) + 1.0;
    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new_with_y_range(160, 50, 0.0, x_max, 0.0, y_max);
    println!("{}", chart.lineplot(&shape));
}
