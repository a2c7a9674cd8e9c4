/// Extension-based file categorization.
///
/// This module holds the ordered category table and the classifier that maps a
/// file name to the name of the category folder it belongs in.
///
/// # Examples
///
/// ```
/// use declutter::file_category::CategoryTable;
///
/// let table = CategoryTable::default();
/// assert_eq!(table.classify("photo.JPG"), "Images");
/// assert_eq!(table.classify("report.pdf"), "Documents");
/// assert_eq!(table.classify("Makefile"), "Others");
/// ```
use std::collections::HashMap;

/// Name of the catch-all category used when no extension matches.
pub const FALLBACK_CATEGORY: &str = "Others";

/// A named bucket of file extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Folder name, used verbatim as the destination subdirectory.
    pub name: String,
    /// Lowercase extensions including the leading dot (e.g. ".jpg").
    pub extensions: Vec<String>,
}

impl Category {
    /// Creates a category from a name and a list of extensions.
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

/// Ordered mapping from category name to extensions, plus a fallback.
///
/// Iteration follows insertion order. If an extension appears under more than
/// one category, the first one added wins.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    fallback: String,
    extension_map: HashMap<String, usize>,
}

impl CategoryTable {
    /// Creates an empty table whose fallback is `fallback`.
    ///
    /// The fallback is registered as a category with no extensions so that it
    /// gets a folder like every other category.
    pub fn new(fallback: &str) -> Self {
        Self {
            categories: vec![Category::new(fallback, &[])],
            fallback: fallback.to_string(),
            extension_map: HashMap::new(),
        }
    }

    /// Builds a table from categories in order. The fallback must be among them.
    pub fn from_categories(categories: Vec<Category>, fallback: &str) -> Self {
        let mut table = Self {
            categories: Vec::new(),
            fallback: fallback.to_string(),
            extension_map: HashMap::new(),
        };
        for category in categories {
            table.push(category);
        }
        table
    }

    /// Adds a category to the table, placed before the fallback.
    pub fn add_category(&mut self, name: &str, extensions: &[&str]) {
        let category = Category::new(name, extensions);
        let fallback_pos = self
            .categories
            .iter()
            .position(|c| c.name == self.fallback);

        match fallback_pos {
            Some(pos) => {
                self.categories.insert(pos, category);
                self.rebuild_index();
            }
            None => self.push(category),
        }
    }

    fn push(&mut self, category: Category) {
        let idx = self.categories.len();
        if category.name != self.fallback {
            for ext in &category.extensions {
                self.extension_map.entry(ext.to_lowercase()).or_insert(idx);
            }
        }
        self.categories.push(category);
    }

    fn rebuild_index(&mut self) {
        let categories = std::mem::take(&mut self.categories);
        self.extension_map.clear();
        for category in categories {
            self.push(category);
        }
    }

    /// All categories in table order, fallback included.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Name of the fallback category.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Looks up the category for an extension such as ".PDF" (case-insensitive).
    ///
    /// Returns `None` for unknown extensions; the fallback is never matched here.
    pub fn extension_to_category(&self, ext: &str) -> Option<&str> {
        self.extension_map
            .get(&ext.to_lowercase())
            .map(|&idx| self.categories[idx].name.as_str())
    }

    /// Category for an already extracted extension, or the fallback.
    pub fn category_for_extension(&self, ext: &str) -> &str {
        self.extension_to_category(ext)
            .unwrap_or(self.fallback.as_str())
    }

    /// Returns the category folder a file named `file_name` belongs in.
    pub fn classify(&self, file_name: &str) -> &str {
        self.category_for_extension(&file_extension(file_name))
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let mut table = Self::new(FALLBACK_CATEGORY);
        table.add_category("Images", &[".jpg", ".jpeg", ".png", ".gif", ".bmp"]);
        table.add_category(
            "Documents",
            &[".pdf", ".docx", ".doc", ".txt", ".xlsx", ".pptx", ".csv"],
        );
        table.add_category("Videos", &[".mp4", ".mkv", ".avi", ".mov"]);
        table.add_category("Audio", &[".mp3", ".wav", ".aac", ".flac"]);
        table.add_category("Archives", &[".zip", ".rar", ".7z", ".tar", ".gz"]);
        table.add_category("setup", &[".exe"]);
        table
    }
}

/// Splits a file name into stem and extension.
///
/// Leading dots are part of the stem, so `.bashrc` has no extension. The
/// extension keeps its dot and its original case.
///
/// ```
/// use declutter::file_category::split_extension;
///
/// assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_extension(".bashrc"), (".bashrc", ""));
/// assert_eq!(split_extension("README"), ("README", ""));
/// ```
pub fn split_extension(file_name: &str) -> (&str, &str) {
    let leading = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[leading..].rfind('.') {
        Some(pos) => file_name.split_at(leading + pos),
        None => (file_name, ""),
    }
}

/// Lowercased extension of `file_name` including the dot, or "" if it has none.
pub fn file_extension(file_name: &str) -> String {
    split_extension(file_name).1.to_lowercase()
}
