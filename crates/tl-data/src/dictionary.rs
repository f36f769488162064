//! The flat dictionary dataset: the richest schema, with categories,
//! difficulty levels, use cases, and search tags.

use serde::Deserialize;

use tl_core::{
    CatalogSource, CommandEntry, CommandOption, CoreError, CoreResult, Difficulty, Example, Tag,
};

const DATA: &str = include_str!("../data/dictionary.yaml");

#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    category: String,
    difficulty: Difficulty,
    description: String,
    syntax: String,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    options: Vec<RawOption>,
    #[serde(default)]
    use_case: Option<String>,
    #[serde(default)]
    related_commands: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    flag: String,
    description: String,
}

/// The built-in command dictionary.
pub struct DictionarySource;

impl CatalogSource for DictionarySource {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn load(&self) -> CoreResult<Vec<CommandEntry>> {
        let raw: Vec<RawEntry> =
            serde_yaml::from_str(DATA).map_err(|err| CoreError::Data(err.to_string()))?;
        raw.into_iter()
            .map(|entry| normalize(entry, self.name()))
            .collect()
    }
}

fn normalize(raw: RawEntry, source: &str) -> CoreResult<CommandEntry> {
    let examples = raw
        .examples
        .into_iter()
        .map(|command| Example {
            command,
            description: None,
        })
        .collect();
    let options = raw
        .options
        .into_iter()
        .map(|option| CommandOption {
            flag: option.flag,
            description: option.description,
            example: None,
        })
        .collect();
    let tags = raw
        .tags
        .into_iter()
        .map(Tag::new)
        .collect::<CoreResult<Vec<_>>>()?;

    CommandEntry::new(
        raw.name,
        source,
        raw.category,
        raw.difficulty,
        raw.description,
        raw.syntax,
        examples,
        options,
        raw.use_case,
        Vec::new(),
        Vec::new(),
        raw.related_commands,
        tags,
        Vec::new(),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_parses_and_normalizes() {
        let entries = DictionarySource.load().expect("dictionary loads");
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|entry| entry.source == "dictionary"));

        let ls = entries
            .iter()
            .find(|entry| entry.name == "ls")
            .expect("ls is in the dictionary");
        assert_eq!(ls.category, "File Management");
        assert!(!ls.examples.is_empty());
    }

    #[test]
    fn dictionary_spans_all_difficulty_levels() {
        let entries = DictionarySource.load().expect("dictionary loads");
        for level in Difficulty::ALL {
            assert!(
                entries.iter().any(|entry| entry.difficulty == level),
                "no {level} entries"
            );
        }
    }
}
