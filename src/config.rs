/// The package searched for unqualified type names when nothing else
/// matches.
pub const DEFAULT_PACKAGE: &str = "java.lang";

/// Settings shared by every document an interpreter loads.
///
/// # Example
/// ```
/// use interplay::config::InterpreterConfig;
///
/// let config = InterpreterConfig::default().with_package("java.util").without_builtins();
///
/// assert_eq!(config.implicit_packages, vec!["java.lang", "java.util"]);
/// assert!(!config.builtins);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Packages searched, in order, for type names that are neither imported
    /// nor fully qualified.
    pub implicit_packages: Vec<String>,
    /// Whether the default host library is installed into new documents.
    pub builtins:          bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { implicit_packages: vec![DEFAULT_PACKAGE.to_string()],
               builtins:          true, }
    }
}

impl InterpreterConfig {
    /// Appends a package to the implicit search list.
    #[must_use]
    pub fn with_package(mut self, package: &str) -> Self {
        if !self.implicit_packages.iter().any(|known| known == package) {
            self.implicit_packages.push(package.to_string());
        }
        self
    }

    /// Disables the default host library.
    #[must_use]
    pub const fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }
}
