use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    builtins,
    config::InterpreterConfig,
    error::{Error, ParseError},
    interpreter::{
        document::{
            interaction::{InteractionEntry, build_entry},
            scanner::{Block, Scanner, SourceLine, normalize},
        },
        evaluator::core::{Environment, EvalResult, Session, evaluate},
        registry::core::CallRegistry,
        types::catalog::TypeCatalog,
    },
};

/// Block id whose body is stored as a named file.
pub const FILE_BLOCK: &str = "file";
/// Block id whose body is evaluated as code.
pub const CODE_BLOCK: &str = "code";

/// A loaded document.
///
/// Holds the registry and environment its code ran against, the files its
/// `file` blocks stored, and its interaction entries in document order.
#[derive(Debug)]
pub struct Document {
    registry:    CallRegistry,
    environment: Environment,
    files:       BTreeMap<String, Vec<String>>,
    entries:     Vec<InteractionEntry>,
}

impl Document {
    /// Creates an empty document, with the default host library unless the
    /// config disables it.
    ///
    /// # Errors
    /// Returns `Error::Library` if the host library cannot be installed.
    pub fn new(config: &InterpreterConfig) -> EvalResult<Self> {
        let catalog = if config.builtins {
            builtins::catalog().map_err(Error::Library)?
        } else {
            TypeCatalog::new()
        };

        Ok(Self::with_catalog(catalog, config))
    }

    /// Creates an empty document whose declarations resolve against
    /// `catalog`.
    #[must_use]
    pub fn with_catalog(catalog: TypeCatalog, config: &InterpreterConfig) -> Self {
        Self { registry:    CallRegistry::new(catalog, &config.implicit_packages),
               environment: Environment::new(),
               files:       BTreeMap::new(),
               entries:     Vec::new(), }
    }

    /// Parses `source` into a new document.
    ///
    /// # Errors
    /// Returns the first parse or runtime error; see [`Document::load`].
    pub fn parse(source: &str, config: &InterpreterConfig) -> EvalResult<Self> {
        let mut document = Self::new(config)?;
        document.load(source)?;
        Ok(document)
    }

    /// Scans and evaluates `source`, appending to this document.
    ///
    /// # Errors
    /// Returns `ParseError::UnknownBlock` for a tag other than `file` or
    /// `code`, `ParseError::MissingFileName` for a `file` block without a
    /// name, and any error raised while scanning or evaluating code. Loading
    /// stops at the first error.
    pub fn load(&mut self, source: &str) -> EvalResult<()> {
        for block in Scanner::new(normalize(source)) {
            match block? {
                Block::Tagged { id, args, body, line } => self.tagged(&id, args, &body, line)?,
                Block::Code(line) => self.evaluate_line(&line)?,
                Block::Interaction(lines) => {
                    let entry = build_entry(&lines, |name| self.environment.get(name).cloned());
                    self.push_entry(entry);
                },
                Block::Blank => {},
            }
        }

        Ok(())
    }

    fn tagged(&mut self,
              id: &str,
              args: Option<String>,
              body: &[SourceLine],
              line: usize)
              -> EvalResult<()> {
        match id {
            FILE_BLOCK => {
                let name = args.map(|name| name.trim().to_string())
                               .filter(|name| !name.is_empty())
                               .ok_or(ParseError::MissingFileName { line })?;
                debug!(file = %name, lines = body.len(), "stored file block");
                self.files
                    .insert(name, body.iter().map(|line| line.text.clone()).collect());
                Ok(())
            },
            CODE_BLOCK => body.iter().try_for_each(|line| self.evaluate_line(line)),
            _ => Err(Error::from(ParseError::UnknownBlock { id: id.to_string(),
                                                            line })),
        }
    }

    fn evaluate_line(&mut self, line: &SourceLine) -> EvalResult<()> {
        let mut session = Session { registry:    &mut self.registry,
                                    environment: &mut self.environment, };

        evaluate(&line.text, line.number, &mut session).map(|_| ())
    }

    /// Records an entry, first inserting an empty one if the document's
    /// first entry would start with input.
    fn push_entry(&mut self, entry: InteractionEntry) {
        if self.entries.is_empty() && entry.carries_input() {
            debug!("inserted empty leading interaction");
            self.entries.push(InteractionEntry::default());
        }
        self.entries.push(entry);
    }

    /// The interaction entries in document order.
    #[must_use]
    pub fn entries(&self) -> &[InteractionEntry] {
        &self.entries
    }

    /// Every stored file, by name.
    #[must_use]
    pub const fn files(&self) -> &BTreeMap<String, Vec<String>> {
        &self.files
    }

    /// The lines of the file stored under `name`.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&[String]> {
        self.files.get(name).map(Vec::as_slice)
    }

    /// The variables bound by the document's code.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The registry the document's code ran against.
    #[must_use]
    pub const fn registry(&self) -> &CallRegistry {
        &self.registry
    }

    /// Runs every analyzer of every entry against `output`.
    ///
    /// # Returns
    /// One message per failed analyzer; empty if all passed.
    #[must_use]
    pub fn analyze(&self, output: &[String]) -> Vec<String> {
        self.entries.iter().flat_map(|entry| entry.analyze(output)).collect()
    }
}
