use rustc_hash::FxHashMap;

use crate::error::RuntimeError;

/// Maps short type names to the fully-qualified names they were imported as.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    names: FxHashMap<String, String>,
}

impl ImportTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the last segment of `qualified` to `qualified`.
    ///
    /// Importing the same name twice is accepted.
    ///
    /// # Errors
    /// Returns `RuntimeError::AmbiguousImport` if the short name is already
    /// bound to a different fully-qualified name.
    ///
    /// # Example
    /// ```
    /// use interplay::interpreter::registry::imports::ImportTable;
    ///
    /// let mut imports = ImportTable::new();
    ///
    /// assert!(imports.insert("java.util.List").is_ok());
    /// assert!(imports.insert("java.util.List").is_ok());
    /// assert!(imports.insert("java.awt.List").is_err());
    /// assert_eq!(imports.get("List"), Some("java.util.List"));
    /// ```
    pub fn insert(&mut self, qualified: &str) -> Result<&str, RuntimeError> {
        let short = short_name(qualified);

        if let Some(existing) = self.names.get(short)
           && existing != qualified
        {
            return Err(RuntimeError::AmbiguousImport { name:      short.to_string(),
                                                       existing:  existing.clone(),
                                                       requested: qualified.to_string(), });
        }

        Ok(self.names
               .entry(short.to_string())
               .or_insert_with(|| qualified.to_string()))
    }

    /// Returns the fully-qualified name bound to `short`.
    #[must_use]
    pub fn get(&self, short: &str) -> Option<&str> {
        self.names.get(short).map(String::as_str)
    }
}

/// Returns the part of a dotted name after the last `.`.
#[must_use]
pub fn short_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}
