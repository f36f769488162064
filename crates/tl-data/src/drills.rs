//! The drills dataset: phase-scoped commands with structured options and
//! examples, tips, common errors, and per-command practice prompts, plus
//! phase-level practice sets and guided projects.

use serde::Deserialize;

use tl_core::{
    CatalogSource, CommandEntry, CommandOption, CoreError, CoreResult, Difficulty, Example,
    PracticeSet, Project, Workbook,
};

const DATA: &str = include_str!("../data/drills.yaml");

#[derive(Debug, Deserialize)]
struct RawPhase {
    phase_id: String,
    phase_name: String,
    baseline_difficulty: Difficulty,
    commands: Vec<RawCommand>,
    #[serde(default)]
    practices: Vec<PracticeSet>,
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
struct RawCommand {
    name: String,
    syntax: String,
    description: String,
    #[serde(default)]
    options: Vec<CommandOption>,
    #[serde(default)]
    examples: Vec<Example>,
    #[serde(default)]
    related_commands: Vec<String>,
    #[serde(default)]
    tips: Vec<String>,
    #[serde(default)]
    common_errors: Vec<String>,
    #[serde(default)]
    practice_exercises: Vec<String>,
}

/// The built-in drill workbook dataset.
pub struct DrillsSource;

impl CatalogSource for DrillsSource {
    fn name(&self) -> &'static str {
        "drills"
    }

    fn load(&self) -> CoreResult<Vec<CommandEntry>> {
        let phases = parse()?;
        let mut entries = Vec::new();
        for phase in phases {
            for command in phase.commands {
                entries.push(normalize(
                    command,
                    &phase.phase_id,
                    &phase.phase_name,
                    phase.baseline_difficulty,
                    self.name(),
                )?);
            }
        }
        Ok(entries)
    }
}

/// Phase-level practice sets and projects carried by the drill dataset.
pub fn workbooks() -> CoreResult<Vec<Workbook>> {
    Ok(parse()?
        .into_iter()
        .map(|phase| Workbook {
            phase_id: phase.phase_id,
            phase_title: phase.phase_name,
            practices: phase.practices,
            projects: phase.projects,
        })
        .collect())
}

fn parse() -> CoreResult<Vec<RawPhase>> {
    serde_yaml::from_str(DATA).map_err(|err| CoreError::Data(err.to_string()))
}

fn normalize(
    raw: RawCommand,
    phase_id: &str,
    phase_name: &str,
    difficulty: Difficulty,
    source: &str,
) -> CoreResult<CommandEntry> {
    CommandEntry::new(
        raw.name,
        source,
        phase_name,
        difficulty,
        raw.description,
        raw.syntax,
        raw.examples,
        raw.options,
        None,
        raw.tips,
        raw.common_errors,
        raw.related_commands,
        Vec::new(),
        raw.practice_exercises,
        Some(phase_id.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drills_parse_with_structured_payload() {
        let entries = DrillsSource.load().expect("drills load");
        assert!(!entries.is_empty());

        let mkdir = entries
            .iter()
            .find(|entry| entry.name == "mkdir")
            .expect("mkdir is in the drills");
        assert!(!mkdir.options.is_empty());
        assert!(mkdir.options.iter().any(|option| option.example.is_some()));
        assert!(!mkdir.practice_exercises.is_empty());
        assert!(mkdir.examples.iter().all(|ex| ex.description.is_some()));
    }

    #[test]
    fn drills_omit_expert_entries() {
        let entries = DrillsSource.load().expect("drills load");
        assert!(entries
            .iter()
            .all(|entry| entry.difficulty != Difficulty::Expert));
    }

    #[test]
    fn workbooks_carry_practices_and_projects() {
        let workbooks = workbooks().expect("workbooks load");
        assert!(!workbooks.is_empty());
        let foundation = workbooks
            .iter()
            .find(|workbook| workbook.phase_id == "foundation")
            .expect("foundation workbook");
        assert!(!foundation.practices.is_empty());
        assert!(!foundation.projects.is_empty());
    }
}
