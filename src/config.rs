//! Configuration for the archive core.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ArchiveError, ArchiveResult};
use crate::parser::{DateExtractor, DateLocale, NameParser};

/// Settings read from `archive.toml`. Every field has a default, so an empty
/// file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Locales whose month names the date extractor understands
    #[serde(default = "default_locales")]
    pub locales: Vec<DateLocale>,

    /// Extensions the tag pattern accepts, matched case-insensitively
    #[serde(default = "default_document_extensions")]
    pub document_extensions: Vec<String>,

    /// Worker threads used for content enrichment
    #[serde(default = "default_enrichment_workers")]
    pub enrichment_workers: usize,

    /// Shortest word the default content tagger reports
    #[serde(default = "default_min_content_tag_length")]
    pub min_content_tag_length: usize,

    /// Root folder renamed documents are moved into
    #[serde(default = "default_archive_root")]
    pub archive_root: PathBuf,

    /// Slugify the specification before renaming
    #[serde(default = "default_slugify_on_rename")]
    pub slugify_on_rename: bool,
}

fn default_locales() -> Vec<DateLocale> {
    vec![DateLocale::De, DateLocale::En]
}

fn default_document_extensions() -> Vec<String> {
    vec![crate::domain::ARCHIVE_EXTENSION.to_string()]
}

fn default_enrichment_workers() -> usize {
    2
}

fn default_min_content_tag_length() -> usize {
    3
}

fn default_archive_root() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("Archive"))
        .unwrap_or_else(|| PathBuf::from("Archive"))
}

fn default_slugify_on_rename() -> bool {
    true
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            locales: default_locales(),
            document_extensions: default_document_extensions(),
            enrichment_workers: default_enrichment_workers(),
            min_content_tag_length: default_min_content_tag_length(),
            archive_root: default_archive_root(),
            slugify_on_rename: default_slugify_on_rename(),
        }
    }
}

impl ArchiveConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ArchiveResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ArchiveResult<Self> {
        toml::from_str(content).map_err(|e| ArchiveError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> ArchiveResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ArchiveError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Filename parser for the configured locales and extensions.
    pub fn name_parser(&self) -> NameParser {
        NameParser::new(DateExtractor::new(&self.locales), &self.document_extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ArchiveConfig::from_toml_str("").unwrap();
        assert_eq!(config.locales, vec![DateLocale::De, DateLocale::En]);
        assert_eq!(config.document_extensions, vec!["pdf"]);
        assert_eq!(config.enrichment_workers, 2);
        assert_eq!(config.min_content_tag_length, 3);
        assert!(config.archive_root.ends_with("Archive"));
        assert!(config.slugify_on_rename);
    }

    #[test]
    fn reads_overrides() {
        let config = ArchiveConfig::from_toml_str(
            r#"
            locales = ["fr"]
            document_extensions = ["pdf", "png"]
            enrichment_workers = 4
            archive_root = "/srv/archive"
            slugify_on_rename = false
            "#,
        )
        .unwrap();

        assert_eq!(config.locales, vec![DateLocale::Fr]);
        assert_eq!(config.document_extensions, vec!["pdf", "png"]);
        assert_eq!(config.enrichment_workers, 4);
        assert_eq!(config.min_content_tag_length, 3);
        assert_eq!(config.archive_root, PathBuf::from("/srv/archive"));
        assert!(!config.slugify_on_rename);
    }

    #[test]
    fn unknown_locale_is_a_config_error() {
        let err = ArchiveConfig::from_toml_str(r#"locales = ["xx"]"#).unwrap_err();
        assert!(matches!(err, ArchiveError::Config(_)));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.toml");

        let config = ArchiveConfig {
            enrichment_workers: 1,
            ..ArchiveConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(ArchiveConfig::load(&path).unwrap(), config);
    }
}
