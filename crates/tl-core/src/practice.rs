//! Daily drill rotation and exercise validation.
//!
//! The original curriculum shuffled a random practice set on every visit and
//! validated lab submissions with a coin flip. Both are replaced here with
//! deterministic logic: the rotation is keyed on a day ordinal, and
//! validation is an explicit stub behind the [`Validator`] seam.

use crate::{CommandEntry, Difficulty, Exercise};

/// One flattened practice prompt, tied back to its command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrillItem<'a> {
    /// The command the prompt exercises.
    pub command: &'a str,
    /// The prompt text.
    pub prompt: &'a str,
    /// Difficulty inherited from the command.
    pub difficulty: Difficulty,
    /// Category inherited from the command.
    pub category: &'a str,
}

/// Flatten every entry's practice prompts into drill items, in catalog order.
pub fn drill_items(entries: &[CommandEntry]) -> Vec<DrillItem<'_>> {
    entries
        .iter()
        .flat_map(|entry| {
            entry.practice_exercises.iter().map(|prompt| DrillItem {
                command: entry.name.as_str(),
                prompt: prompt.as_str(),
                difficulty: entry.difficulty,
                category: entry.category.as_str(),
            })
        })
        .collect()
}

/// Pick a rotating daily subset: start at `day % len` and wrap around.
///
/// The same `day` always yields the same set; at most `items.len()` drills
/// are returned so no prompt repeats within one set.
pub fn daily_set<'a>(items: &[DrillItem<'a>], day: usize, count: usize) -> Vec<DrillItem<'a>> {
    if items.is_empty() || count == 0 {
        return Vec::new();
    }
    let start = day % items.len();
    items
        .iter()
        .cycle()
        .skip(start)
        .take(count.min(items.len()))
        .copied()
        .collect()
}

/// Outcome of validating an exercise submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The submission covers the sample solution.
    Correct,
    /// The submission falls short; a hint may be attached.
    TryAgain { hint: Option<String> },
}

/// Seam for exercise validation.
///
/// The shipped implementation is a deterministic text comparison; a real
/// sandbox would slot in behind the same trait.
pub trait Validator {
    /// Judge a submission against an exercise.
    fn validate(&self, exercise: &Exercise, submission: &str) -> Verdict;
}

/// Validates by checking that every line of the sample solution appears,
/// whitespace-normalized, somewhere in the submission.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolutionMatch;

impl Validator for SolutionMatch {
    fn validate(&self, exercise: &Exercise, submission: &str) -> Verdict {
        let submitted = normalized_lines(submission);
        let missing = normalized_lines(&exercise.solution)
            .into_iter()
            .any(|line| !submitted.contains(&line));
        if missing {
            Verdict::TryAgain {
                hint: exercise.hints.first().cloned(),
            }
        } else {
            Verdict::Correct
        }
    }
}

fn normalized_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_drills(name: &str, prompts: &[&str]) -> CommandEntry {
        CommandEntry::new(
            name,
            "drills",
            "File Management",
            Difficulty::Beginner,
            format!("{name} description"),
            format!("{name} [OPTIONS]"),
            Vec::new(),
            Vec::new(),
            None,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            prompts.iter().map(ToString::to_string).collect(),
            None,
        )
        .unwrap()
    }

    fn exercise(solution: &str, hints: &[&str]) -> Exercise {
        Exercise {
            id: "file-nav-1".into(),
            title: "File System Navigation".into(),
            difficulty: Difficulty::Beginner,
            category: "File System".into(),
            description: "Practice navigating the file system".into(),
            objective: "Navigate and list".into(),
            tasks: vec!["Navigate to /var/log".into()],
            hints: hints.iter().map(ToString::to_string).collect(),
            solution: solution.into(),
            validation: "Check the working directory".into(),
        }
    }

    #[test]
    fn drill_items_flatten_in_catalog_order() {
        let entries = vec![
            entry_with_drills("ls", &["List hidden files", "Sort by size"]),
            entry_with_drills("cp", &["Copy a directory tree"]),
        ];
        let items = drill_items(&entries);
        let prompts: Vec<&str> = items.iter().map(|item| item.prompt).collect();
        assert_eq!(
            prompts,
            ["List hidden files", "Sort by size", "Copy a directory tree"]
        );
        assert_eq!(items[2].command, "cp");
    }

    #[test]
    fn daily_set_rotates_and_wraps() {
        let entries = vec![
            entry_with_drills("ls", &["a", "b"]),
            entry_with_drills("cp", &["c"]),
        ];
        let items = drill_items(&entries);

        let today: Vec<&str> = daily_set(&items, 1, 2).iter().map(|i| i.prompt).collect();
        assert_eq!(today, ["b", "c"]);

        let wrapped: Vec<&str> = daily_set(&items, 2, 2).iter().map(|i| i.prompt).collect();
        assert_eq!(wrapped, ["c", "a"]);

        // Same day, same set.
        assert_eq!(daily_set(&items, 2, 2), daily_set(&items, 2, 2));
    }

    #[test]
    fn daily_set_never_repeats_within_one_set() {
        let entries = vec![entry_with_drills("ls", &["a", "b"])];
        let items = drill_items(&entries);
        let set = daily_set(&items, 0, 10);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn daily_set_of_nothing_is_empty() {
        assert!(daily_set(&[], 3, 5).is_empty());
    }

    #[test]
    fn solution_match_accepts_covering_submission() {
        let exercise = exercise("cd /var/log\nls -lah\ncd ~", &["Use cd"]);
        let verdict = SolutionMatch.validate(&exercise, "cd /var/log\nls   -lah\ncd ~\n");
        assert_eq!(verdict, Verdict::Correct);
    }

    #[test]
    fn solution_match_rejects_and_hints() {
        let exercise = exercise("cd /var/log\nls -lah", &["Use cd"]);
        let verdict = SolutionMatch.validate(&exercise, "pwd");
        assert_eq!(
            verdict,
            Verdict::TryAgain {
                hint: Some("Use cd".into())
            }
        );
    }

    #[test]
    fn solution_match_ignores_comments_and_blank_lines() {
        let exercise = exercise("#!/bin/bash\n\ndf /", &[]);
        let verdict = SolutionMatch.validate(&exercise, "df /");
        assert_eq!(verdict, Verdict::Correct);
    }
}
