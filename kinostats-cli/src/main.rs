mod display;
mod import;
mod live;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use kinostats_db::db::{count_draws, db_path, insert_draw, migrate, open_db};
use kinostats_db::models::{
    parse_numbers, parse_timestamp, validate_draw, Draw, KINO_MAX_NUM, KINO_PICK_COUNT,
};
use kinostats_db::source::{CachedHistory, HistorySource, SqliteHistory};
use kinostats_engine::{compute, StatsConfig};

use crate::display::{display_draws, display_frequency_chart, display_import_summary, display_report};
use crate::live::{observe, LiveSource};

/// Durée de vie de l'historique en cache.
///
/// Une commande `stats` ne charge l'historique qu'une fois : le TTL ne sert
/// qu'aux appelants qui rechargent la même source dans un même processus.
const HISTORY_TTL: Duration = Duration::from_secs(300);

#[derive(Parser)]
#[command(name = "kinostats", about = "Statistiques des tirages Kino")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV (draw_id;drawn_at;n1;...)
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,

        /// Plus grand numéro tirable
        #[arg(long, default_value_t = KINO_MAX_NUM)]
        max_num: u8,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les fréquences, retards et le top-N
    Stats(StatsArgs),

    /// Ajouter un tirage manuellement
    Add,
}

#[derive(Args)]
struct StatsArgs {
    /// Fichier de configuration JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plus grand numéro tirable
    #[arg(long)]
    max_num: Option<u8>,

    /// Fenêtre du classement (défaut : tout l'historique)
    #[arg(long)]
    ranking_window: Option<usize>,

    /// Fenêtre(s) d'affichage, répétable
    #[arg(short, long = "window")]
    windows: Vec<usize>,

    /// Taille du top
    #[arg(short, long)]
    top: Option<usize>,

    /// Page de résultats en direct (fichier local)
    #[arg(long, conflicts_with = "live_url")]
    live_file: Option<PathBuf>,

    /// Page de résultats en direct (URL)
    #[arg(long)]
    live_url: Option<String>,

    /// Nombre de numéros par tirage dans la page en direct
    #[arg(long, default_value_t = KINO_PICK_COUNT)]
    pick_count: usize,

    /// Histogramme des fréquences
    #[arg(long)]
    chart: bool,

    /// Sortie JSON
    #[arg(long)]
    json: bool,

    /// Enregistrer la configuration résolue dans ce fichier JSON
    #[arg(long)]
    save_config: Option<PathBuf>,
}

impl StatsArgs {
    fn config(&self) -> Result<StatsConfig> {
        let mut config = match &self.config {
            Some(path) => StatsConfig::load(path)?,
            None => StatsConfig::default(),
        };
        if let Some(max_num) = self.max_num {
            config.max_num = max_num;
        }
        if self.ranking_window.is_some() {
            config.ranking_window = self.ranking_window;
        }
        if !self.windows.is_empty() {
            config.display_windows = self.windows.clone();
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
        config.validate()?;
        Ok(config)
    }

    fn live_source(&self) -> Option<LiveSource> {
        match (&self.live_file, &self.live_url) {
            (Some(path), _) => Some(LiveSource::File(path.clone())),
            (None, Some(url)) => Some(LiveSource::Url(url.clone())),
            (None, None) => None,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file, max_num } => cmd_import(&conn, &file, max_num),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats(args) => cmd_stats(&conn, &args),
        Command::Add => cmd_add(&conn),
    }
}

fn cmd_import(conn: &kinostats_db::rusqlite::Connection, file: &PathBuf, max_num: u8) -> Result<()> {
    let result = import::import_csv(conn, file, max_num)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &kinostats_db::rusqlite::Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : kinostats import");
        return Ok(());
    }
    let draws = SqliteHistory::new(conn, KINO_MAX_NUM).with_limit(last).load()?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &kinostats_db::rusqlite::Connection, args: &StatsArgs) -> Result<()> {
    let config = args.config()?;
    if let Some(path) = &args.save_config {
        config.save(path)?;
        log::info!("Configuration enregistrée dans {}", path.display());
    }

    let source = CachedHistory::new(SqliteHistory::new(conn, config.max_num), HISTORY_TTL);
    let history = source.load().context("Historique des tirages indisponible")?;
    if history.is_empty() {
        println!("Base vide. Lancez d'abord : kinostats import");
    }

    let candidate = observe(args.live_source().as_ref(), args.pick_count, config.max_num);
    let report = compute(&history, candidate, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    display_report(&report);
    if args.chart {
        display_frequency_chart(&report);
    }
    Ok(())
}

fn cmd_add(conn: &kinostats_db::rusqlite::Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let draw_id = prompt("Numéro du tirage (optionnel) : ")?;
    let drawn_at = parse_timestamp(&prompt("Date et heure (AAAA-MM-JJ HH:MM) : ")?)?;
    let numbers = prompt_numbers()?;

    let mut draw = Draw::new(drawn_at, numbers);
    if !draw_id.is_empty() {
        draw = draw.with_id(draw_id);
    }

    println!("\nTirage à insérer :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Un tirage existe déjà à cette heure (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_numbers() -> Result<Vec<u8>> {
    loop {
        let input = prompt(&format!(
            "{} numéros (séparés par des espaces, 1-{}) : ",
            KINO_PICK_COUNT, KINO_MAX_NUM
        ))?;
        match parse_numbers(&input) {
            Ok(v) if v.len() == KINO_PICK_COUNT => {
                if validate_draw(&v, KINO_MAX_NUM).is_ok() {
                    return Ok(v);
                }
                println!("Numéros invalides (1-{}, pas de doublons). Réessayez.", KINO_MAX_NUM);
            }
            _ => println!("Entrez exactement {} numéros. Réessayez.", KINO_PICK_COUNT),
        }
    }
}
