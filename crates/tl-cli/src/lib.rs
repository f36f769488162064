use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use tl_core::{daily_set, drill_items, group_by_category, related_of, Catalog, Difficulty};
use tl_fs::{load_custom_entries, render_command_markdown, resolve_data_dir, set_data_dir};

#[derive(Parser)]
#[command(name = "tuxlab", version, about = "Linux commands curriculum companion")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Search the command catalog.
    Search {
        /// Free-text query; empty matches everything.
        #[arg(default_value = "")]
        query: String,
        /// Category filter; "all" disables it.
        #[arg(long, default_value = "all")]
        category: String,
        /// Difficulty filter.
        #[arg(long, value_enum, default_value = "all")]
        difficulty: DifficultyArg,
    },
    /// Show one command's full reference as markdown.
    Show { name: String },
    /// List catalog entries grouped by category.
    List {
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long, value_enum, default_value = "all")]
        difficulty: DifficultyArg,
    },
    /// List curated categories and how the catalog uses them.
    Categories,
    /// Resolve a command's related commands.
    Related { name: String },
    /// List the curriculum phases.
    Phases,
    /// Show one curriculum phase by id.
    Phase { id: String },
    /// List the lab scenarios.
    Labs {
        #[arg(long, value_enum, default_value = "all")]
        difficulty: DifficultyArg,
    },
    /// Show one lab by id.
    Lab { id: String },
    /// List the guided exercises.
    Exercises,
    /// Show one guided exercise by id.
    Exercise {
        id: String,
        /// Reveal the sample solution.
        #[arg(long)]
        solution: bool,
    },
    /// Print a rotating set of practice drills.
    Practice {
        /// Number of drills to print.
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Override the rotation day (defaults to today).
        #[arg(long)]
        day: Option<usize>,
    },
    /// Export catalog entries as markdown files.
    Export {
        path: String,
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Show or set the custom-entries directory.
    DataDir {
        /// Record a new directory in the config file.
        #[arg(long)]
        set: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    All,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyArg {
    fn into_filter(self) -> Option<Difficulty> {
        match self {
            DifficultyArg::All => None,
            DifficultyArg::Beginner => Some(Difficulty::Beginner),
            DifficultyArg::Intermediate => Some(Difficulty::Intermediate),
            DifficultyArg::Advanced => Some(Difficulty::Advanced),
            DifficultyArg::Expert => Some(Difficulty::Expert),
        }
    }
}

/// Map the CLI's "all" sentinel to a bypassed filter.
fn category_filter(category: &str) -> Option<&str> {
    if category.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(category)
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Some(c) => c,
        None => return tl_tui::run(),
    };

    match command {
        Command::Search {
            query,
            category,
            difficulty,
        } => search(&query, &category, difficulty),
        Command::Show { name } => show(&name),
        Command::List {
            category,
            difficulty,
        } => list(&category, difficulty),
        Command::Categories => categories(),
        Command::Related { name } => related(&name),
        Command::Phases => phases(),
        Command::Phase { id } => phase(&id),
        Command::Labs { difficulty } => labs(difficulty),
        Command::Lab { id } => lab(&id),
        Command::Exercises => exercises(),
        Command::Exercise { id, solution } => exercise(&id, solution),
        Command::Practice { count, day } => practice(count, day),
        Command::Export { path, category } => export(&path, &category),
        Command::DataDir { set } => data_dir(set),
    }
}

/// Built-in datasets plus whatever the custom-entries directory contributes.
fn load_catalog() -> Result<Catalog> {
    let mut entries = tl_data::load_entries(&tl_data::default_sources())
        .context("failed to load built-in datasets")?;
    let data_dir = resolve_data_dir().context("failed to resolve data directory")?;
    entries.extend(
        load_custom_entries(&data_dir).context("failed to load custom entries")?,
    );
    Ok(Catalog::from_entries(entries))
}

fn search(query: &str, category: &str, difficulty: DifficultyArg) -> Result<()> {
    let catalog = load_catalog()?;
    let matches = catalog.search(query, category_filter(category), difficulty.into_filter());
    if matches.is_empty() {
        println!("No commands matched.");
        return Ok(());
    }
    for entry in matches {
        println!(
            "{}\t{}\t{}\t{}",
            entry.name, entry.difficulty, entry.category, entry.description
        );
    }
    Ok(())
}

fn show(name: &str) -> Result<()> {
    let catalog = load_catalog()?;
    match catalog.find(name) {
        Some(entry) => println!("{}", render_command_markdown(entry)),
        None => println!("No entry named {name}."),
    }
    Ok(())
}

fn list(category: &str, difficulty: DifficultyArg) -> Result<()> {
    let catalog = load_catalog()?;
    let matches = catalog.search("", category_filter(category), difficulty.into_filter());
    if matches.is_empty() {
        println!("No commands matched.");
        return Ok(());
    }
    for group in group_by_category(&matches) {
        println!("{} ({})", group.category, group.entries.len());
        for entry in group.entries {
            println!("  {}\t{}\t{}", entry.name, entry.difficulty, entry.description);
        }
    }
    Ok(())
}

fn categories() -> Result<()> {
    let catalog = load_catalog()?;
    let curated = tl_data::curated_categories().context("failed to load categories")?;

    for category in &curated {
        let count = catalog
            .entries()
            .iter()
            .filter(|entry| &entry.category == category)
            .count();
        println!("{category}\t{count}");
    }

    let mut uncurated: Vec<&str> = Vec::new();
    for entry in catalog.entries() {
        if !curated.contains(&entry.category) && !uncurated.contains(&entry.category.as_str()) {
            uncurated.push(entry.category.as_str());
        }
    }
    if !uncurated.is_empty() {
        println!("\nIn use but not curated: {}", uncurated.join(", "));
    }
    Ok(())
}

fn related(name: &str) -> Result<()> {
    let catalog = load_catalog()?;
    let related = related_of(catalog.entries(), name);
    if related.is_empty() {
        println!("No related commands for {name}.");
        return Ok(());
    }
    for entry in related {
        println!("{}\t{}\t{}", entry.name, entry.category, entry.description);
    }
    Ok(())
}

fn phases() -> Result<()> {
    let curriculum = tl_data::curriculum().context("failed to load curriculum")?;
    for phase in curriculum {
        println!("{}\t{}\t{}", phase.id, phase.duration, phase.title);
    }
    Ok(())
}

fn phase(id: &str) -> Result<()> {
    let curriculum = tl_data::curriculum().context("failed to load curriculum")?;
    let Some(phase) = curriculum.into_iter().find(|phase| phase.id == id) else {
        println!("No phase named {id}.");
        return Ok(());
    };

    println!("{} {} ({})", phase.icon, phase.title, phase.duration);
    println!("{}\n", phase.description);
    print_section("Topics", &phase.topics);
    print_section("Labs", &phase.labs);
    print_section("Projects", &phase.projects);
    print_section("Assessments", &phase.assessments);

    let workbooks = tl_data::workbooks().context("failed to load workbooks")?;
    if let Some(workbook) = workbooks.into_iter().find(|workbook| workbook.phase_id == id) {
        println!("Practice sets:");
        for practice in &workbook.practices {
            println!("  {} [{}]", practice.title, practice.difficulty);
            for task in &practice.tasks {
                println!("    - {task}");
            }
        }
        println!();
        println!("Guided projects:");
        for project in &workbook.projects {
            println!("  {} - {}", project.title, project.description);
        }
    }
    Ok(())
}

fn print_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{title}:");
    for item in items {
        println!("  - {item}");
    }
    println!();
}

fn labs(difficulty: DifficultyArg) -> Result<()> {
    let labs = tl_data::labs().context("failed to load labs")?;
    let filter = difficulty.into_filter();
    let mut shown = 0;
    for lab in &labs {
        if filter.map_or(true, |wanted| lab.difficulty == wanted) {
            println!(
                "{}\t{}\t{}\t{}",
                lab.id, lab.difficulty, lab.duration, lab.title
            );
            shown += 1;
        }
    }
    if shown == 0 {
        println!("No labs matched.");
    }
    Ok(())
}

fn lab(id: &str) -> Result<()> {
    let labs = tl_data::labs().context("failed to load labs")?;
    let Some(lab) = labs.into_iter().find(|lab| lab.id == id) else {
        println!("No lab named {id}.");
        return Ok(());
    };

    println!("{} ({}, {})", lab.title, lab.difficulty, lab.duration);
    println!("{}\n", lab.description);
    println!("Scenario: {}\n", lab.scenario);
    print_section("Objectives", &lab.objectives);
    print_section("Skills", &lab.skills);
    Ok(())
}

fn exercises() -> Result<()> {
    let exercises = tl_data::exercises().context("failed to load exercises")?;
    for exercise in exercises {
        println!(
            "{}\t{}\t{}\t{}",
            exercise.id, exercise.difficulty, exercise.category, exercise.title
        );
    }
    Ok(())
}

fn exercise(id: &str, reveal_solution: bool) -> Result<()> {
    let exercises = tl_data::exercises().context("failed to load exercises")?;
    let Some(exercise) = exercises.into_iter().find(|exercise| exercise.id == id) else {
        println!("No exercise named {id}.");
        return Ok(());
    };

    println!("{} ({}, {})", exercise.title, exercise.difficulty, exercise.category);
    println!("{}\n", exercise.description);
    println!("Objective: {}\n", exercise.objective);
    print_section("Tasks", &exercise.tasks);
    print_section("Hints", &exercise.hints);
    if reveal_solution {
        println!("Sample solution:");
        for line in exercise.solution.lines() {
            if tl_utils::is_destructive_command(line) {
                println!("  {line}    # destructive, read before running");
            } else {
                println!("  {line}");
            }
        }
    }
    Ok(())
}

fn practice(count: usize, day: Option<usize>) -> Result<()> {
    let catalog = load_catalog()?;
    let items = drill_items(catalog.entries());
    let day = day.unwrap_or_else(today_ordinal);
    let set = daily_set(&items, day, count);
    if set.is_empty() {
        println!("No practice drills available.");
        return Ok(());
    }
    for drill in set {
        println!("{}\t{}\t{}", drill.command, drill.difficulty, drill.prompt);
    }
    Ok(())
}

fn today_ordinal() -> usize {
    usize::try_from(Utc::now().date_naive().num_days_from_ce()).unwrap_or(0)
}

fn export(path: &str, category: &str) -> Result<()> {
    let catalog = load_catalog()?;
    let matches = catalog.search("", category_filter(category), None);
    let target = std::path::PathBuf::from(path);
    tl_fs::export_entries(&target, &matches).context("failed to export entries")?;
    println!("Exported {} entries to {}", matches.len(), target.display());
    Ok(())
}

fn data_dir(set: Option<String>) -> Result<()> {
    if let Some(path) = set {
        let path = std::path::PathBuf::from(path);
        set_data_dir(&path).context("failed to save config")?;
        println!("Custom entries directory set to {}", path.display());
        return Ok(());
    }
    let dir = resolve_data_dir().context("failed to resolve data directory")?;
    println!("{}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn all_sentinel_disables_the_category_filter() {
        assert_eq!(category_filter("all"), None);
        assert_eq!(category_filter("ALL"), None);
        assert_eq!(category_filter("Network"), Some("Network"));
    }

    #[test]
    fn difficulty_arg_maps_to_filter() {
        assert_eq!(DifficultyArg::All.into_filter(), None);
        assert_eq!(
            DifficultyArg::Expert.into_filter(),
            Some(Difficulty::Expert)
        );
    }
}
