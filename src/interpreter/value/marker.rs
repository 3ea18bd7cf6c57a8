use std::{fmt, rc::Rc};

/// Type name of information markers.
pub const INFORMATION_TYPE: &str = "interplay.Info";

/// Checks the output a program produced for an interaction.
///
/// Analyzers are attached to interaction entries by substituting a variable
/// bound to an analyzer marker. The document never runs them itself; a caller
/// that executes the program hands its output to `analyze`.
pub trait OutputAnalyzer: fmt::Debug {
    /// Fully-qualified type name used for dispatch on the marker value.
    fn type_name(&self) -> &'static str;

    /// A short human-readable description of the check.
    fn describe(&self) -> String;

    /// Inspects `output` and explains the mismatch if it fails.
    ///
    /// # Errors
    /// Returns a description of why the output does not satisfy the check.
    fn analyze(&self, output: &[String]) -> Result<(), String>;
}

/// A value consumed as an annotation on an interaction.
#[derive(Debug, Clone)]
pub enum Marker {
    /// An auxiliary informational line.
    Information(Rc<str>),
    /// A check to run against later program output.
    Analyzer(Rc<dyn OutputAnalyzer>),
}

impl Marker {
    /// Creates an information marker.
    #[must_use]
    pub fn information(text: &str) -> Self {
        Self::Information(Rc::from(text))
    }

    /// Creates an analyzer marker.
    pub fn analyzer(analyzer: impl OutputAnalyzer + 'static) -> Self {
        Self::Analyzer(Rc::new(analyzer))
    }

    /// The runtime type name of the marker.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Information(_) => INFORMATION_TYPE,
            Self::Analyzer(analyzer) => analyzer.type_name(),
        }
    }
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Information(a), Self::Information(b)) => a == b,
            (Self::Analyzer(a), Self::Analyzer(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Information(text) => write!(f, "{text}"),
            Self::Analyzer(analyzer) => write!(f, "{}", analyzer.describe()),
        }
    }
}
