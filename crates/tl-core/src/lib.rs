//! Core domain entities, rules, and traits for tuxlab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod practice;
mod query;

pub use practice::{daily_set, drill_items, DrillItem, SolutionMatch, Validator, Verdict};
pub use query::{difficulty_counts, group_by_category, related_of, search, CategoryGroup};

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors returned by core validation and dataset loading.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Returned when a validation rule is violated.
    #[error("validation error: {0}")]
    Validation(String),
    /// Returned when a dataset cannot be parsed or loaded.
    #[error("data error: {0}")]
    Data(String),
}

/// A label used to group or filter entries.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Tag {
    value: String,
}

impl Tag {
    /// Create a new tag, rejecting empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> CoreResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CoreError::Validation("tag cannot be empty".into()));
        }
        Ok(Self { value })
    }

    /// Access the tag value.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Learning difficulty attached to catalog entries, labs, and drills.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// All levels in ascending order.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    /// Lowercase label as used in the datasets.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A usage example attached to a catalog entry.
///
/// Some datasets carry bare command strings, others annotate each example;
/// the annotation is optional here so both shapes normalize into one record.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Example {
    /// The command line to run.
    pub command: String,
    /// Optional explanation of what the example does.
    pub description: Option<String>,
}

/// A command-line flag documented on a catalog entry.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CommandOption {
    /// The flag itself, e.g. `-l`.
    pub flag: String,
    /// What the flag does.
    pub description: String,
    /// Optional example invocation using the flag.
    pub example: Option<String>,
}

/// One command's reference record in the normalized catalog.
///
/// `name` is not unique: the built-in datasets overlap and the merged catalog
/// keeps every source's entries in source order.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CommandEntry {
    /// The command token, e.g. `ls`.
    pub name: String,
    /// Which dataset produced the entry.
    pub source: String,
    /// Category label; expected, not guaranteed, to come from the curated list.
    pub category: String,
    /// Learning difficulty.
    pub difficulty: Difficulty,
    /// Human-readable summary.
    pub description: String,
    /// Display-only usage template.
    pub syntax: String,
    /// Usage examples in display order.
    pub examples: Vec<Example>,
    /// Documented flags; not validated against `syntax`.
    pub options: Vec<CommandOption>,
    /// Optional free-text use case.
    pub use_case: Option<String>,
    /// Optional tips.
    pub tips: Vec<String>,
    /// Optional common errors.
    pub common_errors: Vec<String>,
    /// Advisory cross-references; dangling names are allowed.
    pub related_commands: Vec<String>,
    /// Free-text labels used only for search matching.
    pub tags: Vec<Tag>,
    /// Per-command drill prompts feeding the daily practice set.
    pub practice_exercises: Vec<String>,
    /// Curriculum phase id for phase-scoped sources.
    pub phase: Option<String>,
}

impl CommandEntry {
    /// Create a new entry, validating required fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        category: impl Into<String>,
        difficulty: Difficulty,
        description: impl Into<String>,
        syntax: impl Into<String>,
        examples: Vec<Example>,
        options: Vec<CommandOption>,
        use_case: Option<String>,
        tips: Vec<String>,
        common_errors: Vec<String>,
        related_commands: Vec<String>,
        tags: Vec<Tag>,
        practice_exercises: Vec<String>,
        phase: Option<String>,
    ) -> CoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::Validation("name cannot be empty".into()));
        }
        let description = description.into();
        if description.trim().is_empty() {
            return Err(CoreError::Validation("description cannot be empty".into()));
        }
        let syntax = syntax.into();
        if syntax.trim().is_empty() {
            return Err(CoreError::Validation("syntax cannot be empty".into()));
        }

        Ok(Self {
            name,
            source: source.into(),
            category: category.into(),
            difficulty,
            description,
            syntax,
            examples,
            options,
            use_case,
            tips,
            common_errors,
            related_commands,
            tags,
            practice_exercises,
            phase,
        })
    }
}

/// The immutable, in-memory collection of command reference entries.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CommandEntry>,
}

impl Catalog {
    /// Build a catalog from already-normalized entries.
    pub fn from_entries(entries: Vec<CommandEntry>) -> Self {
        Self { entries }
    }

    /// All entries in load order.
    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with the given name, in source order.
    pub fn find(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Filter entries; `None` filters are bypassed.
    pub fn search(
        &self,
        text: &str,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> Vec<&CommandEntry> {
        query::search(&self.entries, text, category, difficulty)
    }
}

/// A dataset that can contribute normalized entries to the catalog.
pub trait CatalogSource {
    /// Return the source name recorded on its entries.
    fn name(&self) -> &'static str;
    /// Load and normalize the entries.
    fn load(&self) -> CoreResult<Vec<CommandEntry>>;
}

/// A curriculum unit grouping topics, labs, and projects; purely descriptive.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Phase {
    /// Stable phase id, e.g. `foundation`.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Human-readable duration, e.g. `Weeks 1-3`.
    pub duration: String,
    /// Summary of the phase.
    pub description: String,
    /// Display icon.
    pub icon: String,
    /// Topics covered.
    pub topics: Vec<String>,
    /// Lab titles.
    pub labs: Vec<String>,
    /// Project titles.
    pub projects: Vec<String>,
    /// Assessment titles.
    pub assessments: Vec<String>,
}

/// A graded practice set attached to a drill phase.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PracticeSet {
    pub title: String,
    pub difficulty: Difficulty,
    pub tasks: Vec<String>,
    pub solution: Option<String>,
}

/// A guided project attached to a drill phase.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub steps: Vec<String>,
    pub expected_outcome: String,
}

/// Practice sets and projects a drill dataset attaches to a curriculum phase.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Workbook {
    pub phase_id: String,
    pub phase_title: String,
    pub practices: Vec<PracticeSet>,
    pub projects: Vec<Project>,
}

/// A hands-on lab scenario.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Lab {
    /// Stable lab id, e.g. `lab-001`.
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    /// Human-readable duration, e.g. `45 min`.
    pub duration: String,
    pub skills: Vec<String>,
    /// Popularity score from 0 to 100.
    pub popularity: u8,
    pub scenario: String,
    pub objectives: Vec<String>,
}

/// A guided exercise with a sample solution and validation guidance.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Exercise {
    /// Stable exercise id, e.g. `file-nav-1`.
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub description: String,
    pub objective: String,
    pub tasks: Vec<String>,
    pub hints: Vec<String>,
    pub solution: String,
    /// Free-text note on what a real validator would check.
    pub validation: String,
}

/// Author block on a community post.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    /// Short initials shown as an avatar.
    pub avatar: String,
    pub role: String,
    pub level: String,
}

/// A post in the community feed mockup.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Post {
    /// Stable post id, e.g. `post-001`.
    pub id: String,
    pub author: Author,
    pub content: String,
    pub posted_at: DateTime<Utc>,
    pub likes: u32,
    pub comments: u32,
    pub tags: Vec<String>,
}

/// A community member profile.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Member {
    /// Stable member id, e.g. `member-001`.
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub role: String,
    pub level: String,
    pub contributions: u32,
    /// Human-readable join date, e.g. `Jan 2023`.
    pub joined: String,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub github: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> CommandEntry {
        CommandEntry::new(
            name,
            "dictionary",
            "File Management",
            Difficulty::Beginner,
            "List directory contents",
            "ls [OPTIONS] [FILE]",
            Vec::new(),
            Vec::new(),
            None,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn tag_rejects_empty() {
        let result = Tag::new("   ");
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn entry_requires_non_empty_fields() {
        let result = CommandEntry::new(
            "",
            "dictionary",
            "File Management",
            Difficulty::Beginner,
            "List directory contents",
            "ls",
            Vec::new(),
            Vec::new(),
            None,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            None,
        );
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn catalog_find_returns_first_match() {
        let mut second = entry("ls");
        second.source = "phase-guide".into();
        let catalog = Catalog::from_entries(vec![entry("ls"), second]);
        let found = catalog.find("ls").expect("entry");
        assert_eq!(found.source, "dictionary");
    }

    #[test]
    fn difficulty_labels_round_trip() {
        for level in Difficulty::ALL {
            let yaml = serde_yaml::to_string(&level).expect("serialize");
            assert_eq!(yaml.trim(), level.label());
        }
    }
}
