//! Organizer configuration.
//!
//! The organizer never reads global state: everything it needs is carried by an
//! [`OrganizerConfig`] value. The built-in defaults reproduce the fixed table and
//! target directory of a plain `declutter` invocation.
//!
//! The default target directory is chosen in this order:
//! 1. `DECLUTTER_TARGET_DIR` set when the binary was compiled
//! 2. `$HOME/Downloads`
//! 3. `./Downloads`

use crate::file_category::CategoryTable;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Errors found while validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The fallback category is not part of the table.
    #[error("fallback category '{0}' is missing from the category table")]
    MissingFallback(String),
    /// The fallback category lists extensions of its own.
    #[error("fallback category '{0}' must not list any extensions")]
    FallbackHasExtensions(String),
    /// Two categories share a name and would share a folder.
    #[error("category '{0}' is defined more than once")]
    DuplicateCategory(String),
    /// A category name cannot be used as a single folder name.
    #[error("invalid category name '{0}': expected a plain folder name")]
    InvalidCategoryName(String),
    /// An extension is not lowercase, lacks its leading dot, or has more than one dot.
    #[error("invalid extension '{extension}' in category '{category}': expected a lowercase '.ext'")]
    InvalidExtension {
        /// Category that lists the extension.
        category: String,
        /// The offending extension.
        extension: String,
    },
}

/// How the organizer reacts when a single file cannot be moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the batch at the first failure. Files already moved stay moved.
    #[default]
    Abort,
    /// Record the failure and carry on with the remaining files.
    Continue,
}

/// Everything the organizer needs to run.
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    /// Directory whose immediate entries are sorted.
    pub target_dir: PathBuf,
    /// Categories and their extensions, fallback included.
    pub categories: CategoryTable,
    /// Behavior on per-file failure.
    pub failure_policy: FailurePolicy,
}

impl OrganizerConfig {
    /// Creates a configuration with the default category table for `target_dir`.
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            categories: CategoryTable::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Replaces the category table.
    pub fn with_categories(mut self, categories: CategoryTable) -> Self {
        self.categories = categories;
        self
    }

    /// Replaces the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Checks that the category table can be used as-is.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking categories in order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fallback = self.categories.fallback();
        let mut seen = HashSet::new();
        let mut has_fallback = false;

        for category in self.categories.categories() {
            if !is_plain_folder_name(&category.name) {
                return Err(ConfigError::InvalidCategoryName(category.name.clone()));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
            if category.name == fallback {
                has_fallback = true;
                if !category.extensions.is_empty() {
                    return Err(ConfigError::FallbackHasExtensions(category.name.clone()));
                }
            }
            for ext in &category.extensions {
                let malformed = ext.len() < 2 || !ext.starts_with('.') || ext[1..].contains('.');
                if malformed || *ext != ext.to_lowercase() {
                    return Err(ConfigError::InvalidExtension {
                        category: category.name.clone(),
                        extension: ext.clone(),
                    });
                }
            }
        }

        if !has_fallback {
            return Err(ConfigError::MissingFallback(fallback.to_string()));
        }
        Ok(())
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self::new(default_target_dir())
    }
}

/// Directory organized when none is given on the command line.
pub fn default_target_dir() -> PathBuf {
    if let Some(dir) = option_env!("DECLUTTER_TARGET_DIR") {
        return PathBuf::from(dir);
    }

    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join("Downloads"),
        None => PathBuf::from("Downloads"),
    }
}

fn is_plain_folder_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::{Category, FALLBACK_CATEGORY};

    fn config_with(categories: Vec<Category>) -> OrganizerConfig {
        OrganizerConfig::new("/tmp/unused")
            .with_categories(CategoryTable::from_categories(categories, "Others"))
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = OrganizerConfig::new("/tmp/anything");
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.categories.fallback(), FALLBACK_CATEGORY);
    }

    #[test]
    fn test_default_target_dir_is_not_empty() {
        assert!(!default_target_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_missing_fallback_rejected() {
        let config = config_with(vec![Category::new("Images", &[".png"])]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingFallback("Others".to_string()))
        );
    }

    #[test]
    fn test_fallback_with_extensions_rejected() {
        let config = config_with(vec![Category::new("Others", &[".bin"])]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::FallbackHasExtensions("Others".to_string()))
        );
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let config = config_with(vec![
            Category::new("Images", &[".png"]),
            Category::new("Images", &[".jpg"]),
            Category::new("Others", &[]),
        ]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateCategory("Images".to_string()))
        );
    }

    #[test]
    fn test_invalid_category_names_rejected() {
        for name in ["", "..", "a/b", "a\\b"] {
            let config = config_with(vec![
                Category::new(name, &[".png"]),
                Category::new("Others", &[]),
            ]);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidCategoryName(_))),
                "name {:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_invalid_extensions_rejected() {
        for ext in ["png", ".PNG", ".", ".tar.gz", ".gz."] {
            let config = config_with(vec![
                Category::new("Images", &[ext]),
                Category::new("Others", &[]),
            ]);
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidExtension {
                    category: "Images".to_string(),
                    extension: ext.to_string(),
                })
            );
        }
    }

    #[test]
    fn test_builder_methods() {
        let config = OrganizerConfig::new("/data").with_failure_policy(FailurePolicy::Continue);
        assert_eq!(config.target_dir, PathBuf::from("/data"));
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
    }
}
