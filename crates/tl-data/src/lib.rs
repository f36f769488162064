//! Built-in datasets for tuxlab and the adapters that normalize them.
//!
//! Three overlapping command datasets feed the catalog, each with its own
//! raw schema and adapter; the curated category list, curriculum, labs,
//! exercises, and community feed are standalone datasets of their own.

use serde::Deserialize;

use tl_core::{
    Catalog, CatalogSource, CommandEntry, CoreError, CoreResult, Exercise, Lab, Member, Phase,
    Post, Workbook,
};

mod dictionary;
mod drills;
mod phase_guide;

pub use dictionary::DictionarySource;
pub use drills::DrillsSource;
pub use phase_guide::PhaseGuideSource;

const CATEGORIES: &str = include_str!("../data/categories.yaml");
const CURRICULUM: &str = include_str!("../data/curriculum.yaml");
const LABS: &str = include_str!("../data/labs.yaml");
const EXERCISES: &str = include_str!("../data/exercises.yaml");
const COMMUNITY: &str = include_str!("../data/community.yaml");

/// The built-in catalog sources, in merge order.
pub fn default_sources() -> Vec<Box<dyn CatalogSource>> {
    vec![
        Box::new(DictionarySource),
        Box::new(PhaseGuideSource),
        Box::new(DrillsSource),
    ]
}

/// Load and concatenate entries from the given sources, in order.
pub fn load_entries(sources: &[Box<dyn CatalogSource>]) -> CoreResult<Vec<CommandEntry>> {
    let mut entries = Vec::new();
    for source in sources {
        entries.extend(source.load()?);
    }
    Ok(entries)
}

/// Build the full catalog from the given sources.
pub fn load_catalog(sources: &[Box<dyn CatalogSource>]) -> CoreResult<Catalog> {
    Ok(Catalog::from_entries(load_entries(sources)?))
}

/// The curated category list.
///
/// Maintained independently of the entry data; entries may use labels that
/// are not curated (and at least one built-in entry does). Nothing enforces
/// agreement between the two.
pub fn curated_categories() -> CoreResult<Vec<String>> {
    serde_yaml::from_str(CATEGORIES).map_err(|err| CoreError::Data(err.to_string()))
}

/// The twelve curriculum phases, in course order.
pub fn curriculum() -> CoreResult<Vec<Phase>> {
    serde_yaml::from_str(CURRICULUM).map_err(|err| CoreError::Data(err.to_string()))
}

/// The hands-on lab scenarios.
pub fn labs() -> CoreResult<Vec<Lab>> {
    serde_yaml::from_str(LABS).map_err(|err| CoreError::Data(err.to_string()))
}

/// The guided exercises.
pub fn exercises() -> CoreResult<Vec<Exercise>> {
    serde_yaml::from_str(EXERCISES).map_err(|err| CoreError::Data(err.to_string()))
}

/// Phase-level practice sets and projects from the drill dataset.
pub fn workbooks() -> CoreResult<Vec<Workbook>> {
    drills::workbooks()
}

#[derive(Debug, Deserialize)]
struct CommunityData {
    posts: Vec<Post>,
    members: Vec<Member>,
}

/// The community feed mockup: static posts.
pub fn posts() -> CoreResult<Vec<Post>> {
    Ok(parse_community()?.posts)
}

/// The community feed mockup: static member profiles.
pub fn members() -> CoreResult<Vec<Member>> {
    Ok(parse_community()?.members)
}

fn parse_community() -> CoreResult<CommunityData> {
    serde_yaml::from_str(COMMUNITY).map_err(|err| CoreError::Data(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sources_merge_in_order() {
        let catalog = load_catalog(&default_sources()).expect("catalog loads");
        assert!(catalog.len() > 40);

        // Source order is dictionary, phase guide, drills.
        let sources: Vec<&str> = catalog
            .entries()
            .iter()
            .map(|entry| entry.source.as_str())
            .collect();
        let first_guide = sources.iter().position(|s| *s == "phase-guide").unwrap();
        let last_dictionary = sources.iter().rposition(|s| *s == "dictionary").unwrap();
        assert!(last_dictionary < first_guide);
    }

    #[test]
    fn duplicate_names_across_sources_are_preserved() {
        let catalog = load_catalog(&default_sources()).expect("catalog loads");
        let ls_count = catalog
            .entries()
            .iter()
            .filter(|entry| entry.name == "ls")
            .count();
        assert!(ls_count > 1, "ls should appear in more than one dataset");
    }

    #[test]
    fn category_drift_is_preserved() {
        let curated = curated_categories().expect("categories load");
        let catalog = load_catalog(&[Box::new(DictionarySource) as Box<dyn CatalogSource>])
            .expect("catalog loads");
        let drifting: Vec<&CommandEntry> = catalog
            .entries()
            .iter()
            .filter(|entry| !curated.contains(&entry.category))
            .collect();
        assert!(
            !drifting.is_empty(),
            "the dictionary deliberately uses at least one uncurated label"
        );
    }

    #[test]
    fn curriculum_has_twelve_phases() {
        let phases = curriculum().expect("curriculum loads");
        assert_eq!(phases.len(), 12);
        assert_eq!(phases[0].id, "foundation");
        assert!(phases.iter().all(|phase| !phase.topics.is_empty()));
    }

    #[test]
    fn labs_and_exercises_load() {
        let labs = labs().expect("labs load");
        assert!(labs.len() >= 8);
        assert!(labs.iter().all(|lab| lab.popularity <= 100));

        let exercises = exercises().expect("exercises load");
        assert!(!exercises.is_empty());
        assert!(exercises.iter().all(|ex| !ex.solution.is_empty()));
    }

    #[test]
    fn community_feed_loads() {
        let posts = posts().expect("posts load");
        let members = members().expect("members load");
        assert!(!posts.is_empty());
        assert!(!members.is_empty());
    }
}
