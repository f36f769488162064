//! Filesystem integration for tuxlab: config resolution, user-supplied
//! catalog entries, and markdown export.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use tl_core::{
    CommandEntry, CommandOption, CoreError, CoreResult, Difficulty, Example, Tag,
};

/// Directory name used for tuxlab's config and data.
pub const APP_DIR_NAME: &str = "tuxlab";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Persisted application configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Directory scanned for user-supplied catalog entries.
    pub data_dir: Option<String>,
}

fn config_path() -> CoreResult<PathBuf> {
    if let Some(dir) = dirs::config_dir() {
        return Ok(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    Err(CoreError::Data(
        "unable to determine config directory".into(),
    ))
}

/// Load the config file, or defaults when none exists.
pub fn load_config() -> CoreResult<AppConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents =
        fs::read_to_string(&path).map_err(|err| CoreError::Data(err.to_string()))?;
    serde_yaml::from_str(&contents).map_err(|err| CoreError::Data(err.to_string()))
}

/// Persist the config file.
pub fn save_config(config: &AppConfig) -> CoreResult<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| CoreError::Data(err.to_string()))?;
    }
    let contents =
        serde_yaml::to_string(config).map_err(|err| CoreError::Data(err.to_string()))?;
    fs::write(path, contents).map_err(|err| CoreError::Data(err.to_string()))?;
    Ok(())
}

/// Record a custom-entries directory in the config file.
pub fn set_data_dir(path: &Path) -> CoreResult<()> {
    let config = AppConfig {
        data_dir: Some(path.to_string_lossy().to_string()),
    };
    save_config(&config)
}

/// Default custom-entries directory (~/.tuxlab).
pub fn default_data_dir() -> CoreResult<PathBuf> {
    if let Some(dir) = dirs::home_dir() {
        return Ok(dir.join(format!(".{APP_DIR_NAME}")));
    }
    Err(CoreError::Data(
        "unable to determine a default data directory".into(),
    ))
}

/// Resolve the custom-entries directory: `TUXLAB_HOME`, then the config
/// file, then the home default.
pub fn resolve_data_dir() -> CoreResult<PathBuf> {
    if let Ok(value) = std::env::var("TUXLAB_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }

    let config = load_config()?;
    if let Some(path) = config.data_dir {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    default_data_dir()
}

/// Raw shape of a user-supplied entry file. Only name, description, and
/// syntax are required; the rest falls back to permissive defaults.
#[derive(Debug, Deserialize)]
struct CustomEntry {
    name: String,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default = "default_difficulty")]
    difficulty: Difficulty,
    description: String,
    syntax: String,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    options: Vec<CustomOption>,
    #[serde(default)]
    use_case: Option<String>,
    #[serde(default)]
    related_commands: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CustomOption {
    flag: String,
    description: String,
}

fn default_category() -> String {
    "Custom".to_string()
}

fn default_difficulty() -> Difficulty {
    Difficulty::Beginner
}

/// Load user-supplied entries from every `*.yaml`/`*.yml` file under `dir`.
///
/// A missing directory is not an error; it simply contributes nothing.
/// Files are visited in name order so the merged catalog is stable.
pub fn load_custom_entries(dir: &Path) -> CoreResult<Vec<CommandEntry>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for file in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !file.file_type().is_file() {
            continue;
        }
        let extension = file.path().extension().and_then(|ext| ext.to_str());
        if !matches!(extension, Some("yaml" | "yml")) {
            continue;
        }
        let contents = fs::read_to_string(file.path())
            .map_err(|err| CoreError::Data(err.to_string()))?;
        let raw: Vec<CustomEntry> = serde_yaml::from_str(&contents).map_err(|err| {
            CoreError::Data(format!("{}: {err}", file.path().display()))
        })?;
        for custom in raw {
            entries.push(normalize_custom(custom)?);
        }
    }
    Ok(entries)
}

fn normalize_custom(raw: CustomEntry) -> CoreResult<CommandEntry> {
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
        "custom",
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

/// Render one entry as a standalone markdown document.
pub fn render_command_markdown(entry: &CommandEntry) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", entry.name));
    out.push_str(&format!("{}\n\n", entry.description));
    out.push_str(&format!("- Source: {}\n", entry.source));
    out.push_str(&format!("- Category: {}\n", entry.category));
    out.push_str(&format!("- Difficulty: {}\n", entry.difficulty));
    if !entry.tags.is_empty() {
        let tags: Vec<&str> = entry.tags.iter().map(Tag::as_str).collect();
        out.push_str(&format!("- Tags: {}\n", tags.join(", ")));
    }
    out.push_str("\n## Syntax\n\n");
    out.push_str(&format!("    {}\n", entry.syntax));

    if !entry.options.is_empty() {
        out.push_str("\n## Options\n\n");
        for option in &entry.options {
            out.push_str(&format!("- `{}` - {}", option.flag, option.description));
            if let Some(example) = &option.example {
                out.push_str(&format!(" (e.g. `{example}`)"));
            }
            out.push('\n');
        }
    }

    if !entry.examples.is_empty() {
        out.push_str("\n## Examples\n\n");
        for example in &entry.examples {
            out.push_str(&format!("- `{}`", example.command));
            if let Some(description) = &example.description {
                out.push_str(&format!(" - {description}"));
            }
            if tl_utils::is_destructive_command(&example.command) {
                out.push_str(" **(destructive)**");
            }
            out.push('\n');
        }
    }

    if let Some(use_case) = &entry.use_case {
        out.push_str("\n## Use Case\n\n");
        out.push_str(&format!("{use_case}\n"));
    }

    if !entry.tips.is_empty() {
        out.push_str("\n## Tips\n\n");
        for tip in &entry.tips {
            out.push_str(&format!("- {tip}\n"));
        }
    }

    if !entry.common_errors.is_empty() {
        out.push_str("\n## Common Errors\n\n");
        for error in &entry.common_errors {
            out.push_str(&format!("- {error}\n"));
        }
    }

    if !entry.related_commands.is_empty() {
        out.push_str("\n## Related Commands\n\n");
        out.push_str(&format!("{}\n", entry.related_commands.join(", ")));
    }

    out
}

/// Export entries as markdown files under `dir`, one file per entry.
pub fn export_entries(dir: &Path, entries: &[&CommandEntry]) -> CoreResult<()> {
    fs::create_dir_all(dir).map_err(|err| CoreError::Data(err.to_string()))?;
    for entry in entries {
        let file_name = export_file_name(entry);
        let content = render_command_markdown(entry);
        fs::write(dir.join(file_name), content)
            .map_err(|err| CoreError::Data(err.to_string()))?;
    }
    Ok(())
}

fn export_file_name(entry: &CommandEntry) -> String {
    let slug = slugify(&entry.name);
    let slug = if slug.is_empty() { "entry" } else { slug.as_str() };
    format!("{}-{slug}.md", entry.source)
}

fn slugify(input: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_entry() -> CommandEntry {
        CommandEntry::new(
            "ls",
            "dictionary",
            "File Management",
            Difficulty::Beginner,
            "List directory contents",
            "ls [OPTIONS] [FILE/DIR]",
            vec![
                Example {
                    command: "ls -la".into(),
                    description: Some("List all files with details".into()),
                },
                Example {
                    command: "ls".into(),
                    description: None,
                },
            ],
            vec![CommandOption {
                flag: "-l".into(),
                description: "Long format with details".into(),
                example: None,
            }],
            Some("View files and directories".into()),
            vec!["Use colors for better readability".into()],
            Vec::new(),
            vec!["tree".into()],
            vec![Tag::new("basic").unwrap()],
            Vec::new(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn markdown_rendering() {
        let markdown = render_command_markdown(&sample_entry());
        insta::assert_snapshot!(markdown, @r"
        # ls

        List directory contents

        - Source: dictionary
        - Category: File Management
        - Difficulty: beginner
        - Tags: basic

        ## Syntax

            ls [OPTIONS] [FILE/DIR]

        ## Options

        - `-l` - Long format with details

        ## Examples

        - `ls -la` - List all files with details
        - `ls`

        ## Use Case

        View files and directories

        ## Tips

        - Use colors for better readability

        ## Related Commands

        tree
        ");
    }

    #[test]
    fn destructive_examples_are_badged() {
        let mut entry = sample_entry();
        entry.examples = vec![Example {
            command: "rm -rf /tmp/cache/".into(),
            description: Some("Force remove directory".into()),
        }];
        let markdown = render_command_markdown(&entry);
        assert!(markdown.contains("`rm -rf /tmp/cache/` - Force remove directory **(destructive)**"));
    }

    #[test]
    fn custom_entries_round_trip() {
        let temp = TempDir::new().expect("temp dir");
        fs::write(
            temp.path().join("my-commands.yaml"),
            concat!(
                "- name: rg\n",
                "  description: Recursively search the current directory\n",
                "  syntax: \"rg [OPTIONS] PATTERN\"\n",
                "  tags: [search]\n",
            ),
        )
        .expect("write custom file");

        let entries = load_custom_entries(temp.path()).expect("load custom entries");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "rg");
        assert_eq!(entries[0].source, "custom");
        assert_eq!(entries[0].category, "Custom");
        assert_eq!(entries[0].difficulty, Difficulty::Beginner);
    }

    #[test]
    fn missing_custom_dir_contributes_nothing() {
        let temp = TempDir::new().expect("temp dir");
        let missing = temp.path().join("nope");
        let entries = load_custom_entries(&missing).expect("missing dir is fine");
        assert!(entries.is_empty());
    }

    #[test]
    fn export_writes_one_file_per_entry() {
        let temp = TempDir::new().expect("temp dir");
        let entry = sample_entry();
        let entries: Vec<&CommandEntry> = vec![&entry];
        export_entries(temp.path(), &entries).expect("export");

        let exported = temp.path().join("dictionary-ls.md");
        assert!(exported.exists());
        let contents = fs::read_to_string(exported).expect("read export");
        assert!(contents.starts_with("# ls"));
    }

    #[test]
    fn slugify_flattens_awkward_names()  {
        assert_eq!(slugify("ssh-keygen"), "ssh-keygen");
        assert_eq!(slugify("source /etc/profile"), "source-etc-profile");
        assert_eq!(slugify("***"), "");
    }
}
