//! Pure filtering and grouping over the command catalog.
//!
//! Every function here is total: for any input a result is produced, and the
//! worst case is an empty result set. Absence of matches is never an error.

use crate::{CommandEntry, Difficulty};

/// One category bucket produced by [`group_by_category`].
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    /// The category label shared by the bucket.
    pub category: &'a str,
    /// Entries in the bucket, in catalog order.
    pub entries: Vec<&'a CommandEntry>,
}

/// Filter entries by free text, category, and difficulty.
///
/// The text match is a case-insensitive substring test against the name, the
/// description, or any tag; an empty or whitespace-only query matches
/// everything. `None` for category or difficulty bypasses that dimension.
/// The result is a borrowed subsequence of `entries` in their original order.
pub fn search<'a>(
    entries: &'a [CommandEntry],
    text: &str,
    category: Option<&str>,
    difficulty: Option<Difficulty>,
) -> Vec<&'a CommandEntry> {
    let needle = text.trim().to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            matches_text(entry, &needle)
                && category.map_or(true, |wanted| entry.category == wanted)
                && difficulty.map_or(true, |wanted| entry.difficulty == wanted)
        })
        .collect()
}

fn matches_text(entry: &CommandEntry, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    entry.name.to_lowercase().contains(needle)
        || entry.description.to_lowercase().contains(needle)
        || entry
            .tags
            .iter()
            .any(|tag| tag.as_str().to_lowercase().contains(needle))
}

/// Partition entries by category, preserving first-seen category order and
/// within-category entry order. The concatenation of all buckets contains
/// every input entry exactly once.
pub fn group_by_category<'a>(entries: &[&'a CommandEntry]) -> Vec<CategoryGroup<'a>> {
    let mut groups: Vec<CategoryGroup<'a>> = Vec::new();
    for entry in entries {
        match groups
            .iter_mut()
            .find(|group| group.category == entry.category)
        {
            Some(group) => group.entries.push(entry),
            None => groups.push(CategoryGroup {
                category: entry.category.as_str(),
                entries: vec![entry],
            }),
        }
    }
    groups
}

/// Resolve the advisory `related_commands` of the first entry named `name`.
///
/// Names without a catalog entry are silently dropped: the relation is
/// display-only and dangling references are expected. An unknown `name`
/// yields an empty result.
pub fn related_of<'a>(entries: &'a [CommandEntry], name: &str) -> Vec<&'a CommandEntry> {
    let Some(entry) = entries.iter().find(|entry| entry.name == name) else {
        return Vec::new();
    };
    entry
        .related_commands
        .iter()
        .filter_map(|related| entries.iter().find(|candidate| &candidate.name == related))
        .collect()
}

/// Tally entries per difficulty level, in ascending level order.
pub fn difficulty_counts(entries: &[CommandEntry]) -> [(Difficulty, usize); 4] {
    let mut counts = Difficulty::ALL.map(|level| (level, 0));
    for entry in entries {
        for slot in &mut counts {
            if slot.0 == entry.difficulty {
                slot.1 += 1;
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tag;

    fn entry(name: &str, category: &str, difficulty: Difficulty, tags: &[&str]) -> CommandEntry {
        CommandEntry::new(
            name,
            "dictionary",
            category,
            difficulty,
            format!("{name} description"),
            format!("{name} [OPTIONS]"),
            Vec::new(),
            Vec::new(),
            None,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            tags.iter().map(|tag| Tag::new(*tag).unwrap()).collect(),
            Vec::new(),
            None,
        )
        .unwrap()
    }

    fn sample_catalog() -> Vec<CommandEntry> {
        vec![
            entry("ls", "File Management", Difficulty::Beginner, &["basic"]),
            entry("grep", "Text Processing", Difficulty::Intermediate, &[]),
            entry("cp", "File Management", Difficulty::Beginner, &["basic"]),
            entry("awk", "Text Processing", Difficulty::Advanced, &["text"]),
        ]
    }

    fn names(entries: &[&CommandEntry]) -> Vec<String> {
        entries.iter().map(|entry| entry.name.clone()).collect()
    }

    #[test]
    fn empty_filters_return_catalog_in_order() {
        let catalog = sample_catalog();
        let result = search(&catalog, "", None, None);
        assert_eq!(names(&result), ["ls", "grep", "cp", "awk"]);
    }

    #[test]
    fn result_is_a_subsequence_of_the_catalog() {
        let catalog = sample_catalog();
        let result = search(&catalog, "a", None, None);
        let mut last_index = 0;
        for found in &result {
            let index = catalog
                .iter()
                .position(|entry| std::ptr::eq(entry, *found))
                .expect("entry comes from the catalog");
            assert!(index >= last_index);
            last_index = index;
        }
    }

    #[test]
    fn text_match_is_case_insensitive() {
        let catalog = sample_catalog();
        let upper = search(&catalog, "LS", None, None);
        let lower = search(&catalog, "ls", None, None);
        assert_eq!(names(&upper), names(&lower));
        assert_eq!(names(&upper), ["ls"]);
    }

    #[test]
    fn filters_combine_conjunctively() {
        let catalog = sample_catalog();
        let combined = search(&catalog, "", Some("File Management"), Some(Difficulty::Beginner));
        let by_text = search(&catalog, "", None, None);
        let expected: Vec<String> = by_text
            .iter()
            .filter(|entry| entry.category == "File Management")
            .filter(|entry| entry.difficulty == Difficulty::Beginner)
            .map(|entry| entry.name.clone())
            .collect();
        assert_eq!(names(&combined), expected);
    }

    #[test]
    fn tag_matches_count_as_text_matches() {
        let catalog = sample_catalog();
        let result = search(&catalog, "bas", None, None);
        assert_eq!(names(&result), ["ls", "cp"]);
    }

    #[test]
    fn no_match_is_an_empty_result_not_an_error() {
        let catalog = sample_catalog();
        let result = search(&catalog, "zzzznotacommand", None, None);
        assert!(result.is_empty());
    }

    #[test]
    fn unknown_difficulty_filter_yields_empty() {
        let catalog = sample_catalog();
        let result = search(&catalog, "", None, Some(Difficulty::Expert));
        assert!(result.is_empty());
    }

    #[test]
    fn category_filter_alone() {
        let catalog = sample_catalog();
        let result = search(&catalog, "", Some("Text Processing"), None);
        assert_eq!(names(&result), ["grep", "awk"]);
    }

    #[test]
    fn grouping_partitions_exactly() {
        let catalog = sample_catalog();
        let filtered = search(&catalog, "", None, None);
        let groups = group_by_category(&filtered);

        let labels: Vec<&str> = groups.iter().map(|group| group.category).collect();
        assert_eq!(labels, ["File Management", "Text Processing"]);

        let flattened: Vec<String> = groups
            .iter()
            .flat_map(|group| group.entries.iter().map(|entry| entry.name.clone()))
            .collect();
        assert_eq!(flattened.len(), filtered.len());
        assert_eq!(flattened, ["ls", "cp", "grep", "awk"]);
    }

    #[test]
    fn related_lookup_drops_dangling_names() {
        let mut catalog = sample_catalog();
        catalog[0].related_commands = vec!["cp".into(), "nonexistent".into()];
        let related = related_of(&catalog, "ls");
        assert_eq!(names(&related), ["cp"]);
    }

    #[test]
    fn related_lookup_of_unknown_command_is_empty() {
        let catalog = sample_catalog();
        assert!(related_of(&catalog, "nonexistent").is_empty());
    }

    #[test]
    fn difficulty_counts_cover_all_levels() {
        let catalog = sample_catalog();
        let counts = difficulty_counts(&catalog);
        assert_eq!(
            counts,
            [
                (Difficulty::Beginner, 2),
                (Difficulty::Intermediate, 1),
                (Difficulty::Advanced, 1),
                (Difficulty::Expert, 0),
            ]
        );
    }
}
