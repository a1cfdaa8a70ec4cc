use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use nutri_core::*;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "nutri")]
#[command(about = "Nutrition target and daily tracking system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a user profile and compute its targets
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        age: u32,
        /// Height in cm
        #[arg(long)]
        height: u32,
        /// Weight in kg
        #[arg(long)]
        weight: u32,
        /// male or female
        #[arg(long)]
        gender: String,
        /// bulk, cut, or maintain
        #[arg(long)]
        goal: String,
        /// sedentary, light, moderate, or heavy
        #[arg(long, default_value = "light")]
        activity: String,
        /// ectomorph, mesomorph, or endomorph
        #[arg(long, default_value = "mesomorph")]
        body_type: String,
    },

    /// Log one food entry into a meal slot
    Log {
        #[arg(long)]
        user: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        portion: u32,
        /// Protein in grams
        #[arg(long)]
        protein: u32,
        #[arg(long)]
        calories: u32,
        /// morning, midday, evening, or night
        #[arg(long)]
        slot: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Opaque image filename
        #[arg(long)]
        image: Option<String>,
    },

    /// Log a batch of entries from a JSON file (malformed items are skipped)
    LogBatch {
        #[arg(long)]
        user: String,
        /// JSON array of {name, portion, protein, calories, slot}
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Log a catalog food by id, copying it into the day's ledger
    Pick {
        #[arg(long)]
        user: String,
        #[arg(long)]
        food_id: Uuid,
        #[arg(long, default_value_t = 1)]
        portion: u32,
        #[arg(long)]
        slot: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Manage the shared food catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Show the day's per-slot totals and target progress
    Dashboard {
        #[arg(long)]
        user: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Archive the day's totals into a report
    Archive {
        #[arg(long)]
        user: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Also clear the day's ledger (no-op when the day is empty)
        #[arg(long)]
        reset: bool,
    },

    /// List archived reports, newest first
    Reports {
        #[arg(long)]
        user: String,
    },

    /// Export a user's reports to CSV
    Export {
        #[arg(long)]
        user: String,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// Insert the built-in seed foods (idempotent)
    Seed,
    /// Add a shared catalog entry
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        protein: u32,
        #[arg(long)]
        calories: u32,
        #[arg(long)]
        image: Option<String>,
    },
    /// List catalog entries
    List,
}

fn main() -> Result<()> {
    nutri_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store_path = data_dir.join("nutrition.json");

    match cli.command {
        Commands::Register {
            username,
            age,
            height,
            weight,
            gender,
            goal,
            activity,
            body_type,
        } => cmd_register(
            &store_path,
            RegisterProfile {
                username,
                age,
                height_cm: height,
                weight_kg: weight,
                gender: Gender::from_str(&gender)?,
                goal: Goal::from_str(&goal)?,
                activity: ActivityLevel::parse_lenient(&activity),
                body_type: BodyType::parse_lenient(&body_type),
            },
        ),
        Commands::Log {
            user,
            name,
            portion,
            protein,
            calories,
            slot,
            date,
            image,
        } => cmd_log(
            &store_path,
            &user,
            NewFoodEntry {
                name,
                portion_count: portion,
                protein_grams: protein,
                calories,
                image,
                slot: MealSlot::from_str(&slot)?,
                date: today_or(date),
            },
        ),
        Commands::LogBatch { user, file, date } => {
            cmd_log_batch(&store_path, &user, &file, today_or(date))
        }
        Commands::Pick {
            user,
            food_id,
            portion,
            slot,
            date,
        } => cmd_pick(
            &store_path,
            &user,
            food_id,
            portion,
            MealSlot::from_str(&slot)?,
            today_or(date),
        ),
        Commands::Catalog { command } => cmd_catalog(&store_path, command),
        Commands::Dashboard { user, date } => cmd_dashboard(&store_path, &user, today_or(date)),
        Commands::Archive { user, date, reset } => {
            cmd_archive(&store_path, &user, today_or(date), reset)
        }
        Commands::Reports { user } => cmd_reports(&store_path, &user),
        Commands::Export { user, out } => cmd_export(&store_path, &user, &out),
    }
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

fn resolve_user(store: &NutritionStore, username: &str) -> Result<UserProfile> {
    store
        .find_user_by_username(username)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("user '{}'", username)))
}

fn cmd_register(store_path: &Path, input: RegisterProfile) -> Result<()> {
    let profile = NutritionStore::update(store_path, |store| register_profile(store, input))?;
    let targets = compute_targets(&profile);

    println!("✓ Registered '{}'", profile.username);
    println!("  BMR:  {:.0} kcal", targets.bmr);
    println!("  TDEE: {:.0} kcal", targets.tdee);
    println!("  Target calories: {:.0} kcal", targets.target_calories);
    println!("  Target protein:  {:.0} g", targets.target_protein);
    Ok(())
}

fn cmd_log(store_path: &Path, username: &str, entry: NewFoodEntry) -> Result<()> {
    let (food, record) = NutritionStore::update(store_path, |store| {
        let user = resolve_user(store, username)?;
        add_entry(store, user.id, entry)
    })?;

    println!(
        "✓ Logged '{}' ({} g protein, {} kcal) at {} on {}",
        food.name, food.protein_grams, food.calories, record.slot, record.date
    );
    Ok(())
}

fn cmd_log_batch(store_path: &Path, username: &str, file: &Path, date: NaiveDate) -> Result<()> {
    let contents = std::fs::read_to_string(file)?;
    let items: Vec<BatchItem> = serde_json::from_str(&contents)?;
    let submitted = items.len();

    let accepted = NutritionStore::update(store_path, |store| {
        let user = resolve_user(store, username)?;
        add_entry_batch(store, user.id, date, items)
    })?;

    println!("✓ Logged {} of {} entries for {}", accepted.len(), submitted, date);
    if accepted.len() < submitted {
        println!("  {} item(s) skipped (missing required fields)", submitted - accepted.len());
    }
    Ok(())
}

fn cmd_pick(
    store_path: &Path,
    username: &str,
    food_id: Uuid,
    portion: u32,
    slot: MealSlot,
    date: NaiveDate,
) -> Result<()> {
    let (food, record) = NutritionStore::update(store_path, |store| {
        let user = resolve_user(store, username)?;
        log_catalog_food(store, user.id, food_id, portion, slot, date)
    })?;

    println!(
        "✓ Logged '{}' x{} at {} on {}",
        food.name, food.portion_count, record.slot, record.date
    );
    Ok(())
}

fn cmd_catalog(store_path: &Path, command: CatalogCommands) -> Result<()> {
    match command {
        CatalogCommands::Seed => {
            let added = NutritionStore::update(store_path, |store| Ok(seed_catalog(store)))?;
            println!("✓ Seeded {} catalog foods", added);
        }
        CatalogCommands::Add {
            name,
            protein,
            calories,
            image,
        } => {
            let entry = NutritionStore::update(store_path, |store| {
                add_catalog_food(
                    store,
                    NewCatalogFood {
                        name,
                        protein_grams: protein,
                        calories,
                        image,
                    },
                )
            })?;
            println!("✓ Added catalog food '{}' ({})", entry.name, entry.id);
        }
        CatalogCommands::List => {
            let store = NutritionStore::load(store_path)?;
            let foods = list_catalog(&store);
            if foods.is_empty() {
                println!("Catalog is empty.");
                return Ok(());
            }
            println!("CATALOG ({} foods)", foods.len());
            for food in foods {
                println!(
                    "  {}  {} — {} g protein, {} kcal",
                    food.id, food.name, food.protein_grams, food.calories
                );
            }
        }
    }
    Ok(())
}

fn cmd_dashboard(store_path: &Path, username: &str, date: NaiveDate) -> Result<()> {
    let store = NutritionStore::load(store_path)?;
    let user = resolve_user(&store, username)?;
    let summary = aggregate_day(&store, user.id, date);

    display_dashboard(&store, &user, &summary);
    Ok(())
}

fn display_dashboard(store: &NutritionStore, user: &UserProfile, summary: &DaySummary) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  DAILY DASHBOARD — {}", summary.date);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {} (bmr {:.0}, tdee {:.0})", user.username, user.bmr, user.tdee);
    println!();

    for slot in MealSlot::ALL {
        let totals = summary.slot(slot);
        println!(
            "  {:<8} {:>4} g protein  {:>5} kcal",
            slot.to_string(),
            totals.total_protein,
            totals.total_calories
        );
        for (food, _) in list_by_slot_and_date(store, user.id, slot, summary.date) {
            println!("           · {} x{}", food.name, food.portion_count);
        }
    }

    println!();
    println!(
        "  Calories: {} / {:.0} kcal ({:.1}%) — {}",
        summary.total_calories,
        summary.targets.target_calories,
        summary.progress_calories,
        reached_label(summary.calories_reached)
    );
    println!(
        "  Protein:  {} / {:.0} g ({:.1}%) — {}",
        summary.total_protein,
        summary.targets.target_protein,
        summary.progress_protein,
        reached_label(summary.protein_reached)
    );
    println!();
}

fn reached_label(reached: bool) -> &'static str {
    if reached {
        "target reached"
    } else {
        "target not reached"
    }
}

fn cmd_archive(store_path: &Path, username: &str, date: NaiveDate, reset: bool) -> Result<()> {
    let report = NutritionStore::update(store_path, |store| {
        let user = resolve_user(store, username)?;
        archive_day(store, user.id, date, reset)
    })?;

    match report {
        Some(report) => {
            println!(
                "✓ Archived {}: {} g protein, {} kcal",
                date, report.total_protein, report.total_calories
            );
            if reset {
                println!("  Ledger cleared for {}", date);
            }
        }
        None => println!("Nothing to archive for {}", date),
    }
    Ok(())
}

fn cmd_reports(store_path: &Path, username: &str) -> Result<()> {
    let store = NutritionStore::load(store_path)?;
    let user = resolve_user(&store, username)?;
    let reports = list_reports(&store, user.id);

    if reports.is_empty() {
        println!("No reports for '{}'.", username);
        return Ok(());
    }

    println!("REPORTS for '{}' ({} total)", username, reports.len());
    for report in reports {
        println!(
            "  {}  {:>5} g protein  {:>6} kcal  [{}]",
            report.created_at.format("%Y-%m-%d %H:%M"),
            report.total_protein,
            report.total_calories,
            report.label
        );
    }
    Ok(())
}

fn cmd_export(store_path: &Path, username: &str, out: &Path) -> Result<()> {
    let store = NutritionStore::load(store_path)?;
    let user = resolve_user(&store, username)?;
    let count = export_reports_csv(&store, user.id, out)?;

    if count == 0 {
        println!("No reports to export for '{}'.", username);
    } else {
        println!("✓ Exported {} reports", count);
        println!("  CSV: {}", out.display());
    }
    Ok(())
}
