// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use label_scanner::{
    config::DEFAULT_SETTINGS_PATH, logging, DisambiguationPrompt, LabelData, NumberMode,
    Resolution, Resolver, Settings,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (config_path, args) = split_config_flag(args)?;
    let settings = Settings::load(&config_path)?;

    match args.first().map(String::as_str) {
        Some("check") => {
            logging::init();
            run_check(&settings)
        }
        Some("resolve") => {
            logging::init();
            let Some(barcode) = args.get(1) else {
                bail!("usage: label-scanner resolve <barcode>");
            };
            run_resolve(&settings, barcode)
        }
        Some("search") => {
            logging::init();
            run_search(&settings, &args[1..])
        }
        Some(other) => {
            bail!(
                "unknown command '{}'. Commands: check | resolve <barcode> | search [--new] <terms...>",
                other
            )
        }
        None => run_ui_mode(&settings),
    }
}

/// Pull `--config <path>` out of the argument list
fn split_config_flag(args: Vec<String>) -> Result<(PathBuf, Vec<String>)> {
    let mut config_path = PathBuf::from(DEFAULT_SETTINGS_PATH);
    let mut rest = Vec::new();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        if arg == "--config" {
            match iter.next() {
                Some(path) => config_path = PathBuf::from(path),
                None => bail!("--config needs a path"),
            }
        } else {
            rest.push(arg);
        }
    }

    Ok((config_path, rest))
}

/// Load catalog and corrections, or stop the process with the reason
fn load_data_or_exit(settings: &Settings) -> LabelData {
    match LabelData::load(settings) {
        Ok(data) => data,
        Err(err) => {
            let (title, message) = err.operator_message();
            eprintln!("❌ {}", title);
            eprintln!("   {}", message);
            eprintln!("   The label station cannot start without its data files.");
            std::process::exit(1);
        }
    }
}

fn run_check(settings: &Settings) -> Result<()> {
    println!("🔍 Checking label data");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let data = load_data_or_exit(settings);

    println!("✓ Catalog:     {} items ({:?})", data.catalog.len(), settings.catalog_path);
    println!("✓ Corrections: {} rules ({:?})", data.corrections.len(), settings.corrections_path);

    let missing_artwork: Vec<_> = data
        .catalog
        .all()
        .iter()
        .filter(|item| {
            !settings
                .label_dir
                .join(format!("{}.png", item.barcode))
                .exists()
        })
        .collect();

    if missing_artwork.is_empty() {
        println!("✓ Label artwork present for every item");
    } else {
        println!("⚠ {} item(s) have no label artwork:", missing_artwork.len());
        for item in missing_artwork {
            println!("   {} {} ({})", item.barcode, item.name, item.color);
        }
    }

    Ok(())
}

/// Asks on the terminal which item an ambiguous barcode belongs to
struct StdinPrompt;

impl DisambiguationPrompt for StdinPrompt {
    fn ask(&mut self, labels: &[String]) -> Option<String> {
        println!("Several items were mislabelled with this barcode. Which one was scanned?");
        for (i, label) in labels.iter().enumerate() {
            println!("  {}) {}", i + 1, label);
        }
        print!("Choice (empty to cancel): ");
        io::stdout().flush().ok()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;

        let choice: usize = line.trim().parse().ok()?;
        labels.get(choice.checked_sub(1)?).cloned()
    }
}

fn run_resolve(settings: &Settings, input: &str) -> Result<()> {
    let data = load_data_or_exit(settings);
    let resolver = Resolver::new(&data);

    match resolver.resolve(input, &mut StdinPrompt) {
        Resolution::Resolved(resolved) => {
            println!("Item name:  {}", resolved.item.name);
            println!("Color:      {}", resolved.item.color);
            println!("Old number: {}", resolved.item.old_number);
            println!("New number: {}", resolved.item.new_number);
            println!("Barcode:    {}", resolved.barcode_display());
        }
        Resolution::Cancelled => println!("Cancelled."),
        other => {
            if let Some((title, message)) = other.warning() {
                eprintln!("⚠ {}: {}", title, message);
            }
            std::process::exit(2);
        }
    }

    Ok(())
}

fn run_search(settings: &Settings, args: &[String]) -> Result<()> {
    let data = load_data_or_exit(settings);
    let index = label_scanner::LookupIndex::new(&data.catalog);

    let mode = if args.iter().any(|a| a == "--new") {
        NumberMode::New
    } else {
        NumberMode::Old
    };
    let query = args
        .iter()
        .filter(|a| a.as_str() != "--new")
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    for label in index.search(&query, mode) {
        println!("{}", label);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(settings: &Settings) -> Result<()> {
    logging::init_to_file(&settings.debug_log_path)?;

    println!("🏷️  Loading label data...");
    let data = std::sync::Arc::new(load_data_or_exit(settings));
    println!(
        "✓ Loaded {} items, {} corrections",
        data.catalog.len(),
        data.corrections.len()
    );

    let station = label_scanner::Station::from_settings(settings, data);
    let mut app = ui::App::new(station);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_settings: &Settings) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: label-scanner resolve <barcode>");
    std::process::exit(1);
}
