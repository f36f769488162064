//! The phase guide dataset: commands grouped under curriculum phases.
//!
//! This schema carries no per-command category or difficulty; normalization
//! uses the phase title as the category label and the phase's declared
//! baseline difficulty. Example strings embed `#` annotations, which the
//! adapter splits into command and description.

use serde::Deserialize;

use tl_core::{
    CatalogSource, CommandEntry, CommandOption, CoreError, CoreResult, Difficulty, Example,
};

const DATA: &str = include_str!("../data/phase_guide.yaml");

#[derive(Debug, Deserialize)]
struct RawPhase {
    phase_id: String,
    title: String,
    baseline_difficulty: Difficulty,
    commands: Vec<RawCommand>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawCommand {
    name: String,
    description: String,
    syntax: String,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    related_commands: Vec<String>,
}

/// The built-in phase guide.
pub struct PhaseGuideSource;

impl CatalogSource for PhaseGuideSource {
    fn name(&self) -> &'static str {
        "phase-guide"
    }

    fn load(&self) -> CoreResult<Vec<CommandEntry>> {
        let phases: Vec<RawPhase> =
            serde_yaml::from_str(DATA).map_err(|err| CoreError::Data(err.to_string()))?;
        let mut entries = Vec::new();
        for phase in phases {
            for command in &phase.commands {
                entries.push(normalize(command.clone(), &phase, self.name())?);
            }
        }
        Ok(entries)
    }
}

fn normalize(raw: RawCommand, phase: &RawPhase, source: &str) -> CoreResult<CommandEntry> {
    let examples = raw.examples.iter().map(|line| split_example(line)).collect();
    let options = raw.options.iter().map(|line| split_option(line)).collect();

    CommandEntry::new(
        raw.name,
        source,
        phase.title.clone(),
        phase.baseline_difficulty,
        raw.description,
        raw.syntax,
        examples,
        options,
        None,
        Vec::new(),
        Vec::new(),
        raw.related_commands,
        Vec::new(),
        Vec::new(),
        Some(phase.phase_id.clone()),
    )
}

/// Split `"ls -la   # List all files"` into command and annotation.
///
/// The marker is a space followed by `#`, so a `#` inside the command
/// itself (e.g. a quoted `'^#'` pattern) does not end it.
fn split_example(line: &str) -> Example {
    match line.split_once(" #") {
        Some((command, annotation)) if !command.trim().is_empty() => Example {
            command: command.trim().to_string(),
            description: Some(annotation.trim().to_string()),
        },
        _ => Example {
            command: line.trim().to_string(),
            description: None,
        },
    }
}

/// Split `"-l (long format)"` into flag and description.
fn split_option(line: &str) -> CommandOption {
    match line.split_once(' ') {
        Some((flag, rest)) => CommandOption {
            flag: flag.to_string(),
            description: rest.trim().trim_matches(['(', ')']).to_string(),
            example: None,
        },
        None => CommandOption {
            flag: line.to_string(),
            description: String::new(),
            example: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_guide_parses_and_inherits_phase_fields() {
        let entries = PhaseGuideSource.load().expect("phase guide loads");
        assert!(!entries.is_empty());

        let pwd = entries
            .iter()
            .find(|entry| entry.name == "pwd")
            .expect("pwd is in the foundation phase");
        assert_eq!(pwd.phase.as_deref(), Some("foundation"));
        assert_eq!(pwd.category, "Linux Foundation");
        assert_eq!(pwd.difficulty, Difficulty::Beginner);
    }

    #[test]
    fn annotated_examples_are_split() {
        let example = split_example("ls -la               # List all files with details");
        assert_eq!(example.command, "ls -la");
        assert_eq!(example.description.as_deref(), Some("List all files with details"));

        let bare = split_example("whoami");
        assert_eq!(bare.command, "whoami");
        assert!(bare.description.is_none());
    }

    #[test]
    fn plain_options_are_split() {
        let option = split_option("-l (long format)");
        assert_eq!(option.flag, "-l");
        assert_eq!(option.description, "long format");
    }
}
