use rustc_hash::FxHashMap;

use crate::interpreter::types::catalog::TypeCatalog;

/// Index of a discovered type in a `SubclassIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeIdx(usize);

#[derive(Debug, Clone)]
struct IndexedType {
    name:       String,
    subclasses: Vec<TypeIdx>,
}

/// Records every type the interpreter has referenced so far, together with
/// the previously discovered types assignable to it.
///
/// Types are kept in an arena and refer to each other by index. The index
/// only grows: a type is discovered once and never forgotten.
#[derive(Debug, Clone, Default)]
pub struct SubclassIndex {
    types:   Vec<IndexedType>,
    by_name: FxHashMap<String, TypeIdx>,
}

impl SubclassIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovers `name`, linking it to every already-known sub- and
    /// supertype.
    ///
    /// Returns the index of the type and whether this call discovered it.
    ///
    /// # Example
    /// ```
    /// use interplay::interpreter::types::{catalog::TypeCatalog, discovery::SubclassIndex};
    ///
    /// let catalog = TypeCatalog::new();
    /// let mut index = SubclassIndex::new();
    ///
    /// index.discover("java.lang.Number", &catalog);
    /// let (_, new) = index.discover("java.lang.Integer", &catalog);
    ///
    /// assert!(new);
    /// assert_eq!(index.subclasses_of("java.lang.Number"), vec!["java.lang.Integer"]);
    /// ```
    pub fn discover(&mut self, name: &str, catalog: &TypeCatalog) -> (TypeIdx, bool) {
        if let Some(&idx) = self.by_name.get(name) {
            return (idx, false);
        }

        let idx = TypeIdx(self.types.len());
        let mut subclasses = Vec::new();

        for (position, known) in self.types.iter_mut().enumerate() {
            if catalog.is_assignable(name, &known.name) {
                known.subclasses.push(idx);
            }
            if catalog.is_assignable(&known.name, name) {
                subclasses.push(TypeIdx(position));
            }
        }

        self.types.push(IndexedType { name: name.to_string(),
                                      subclasses });
        self.by_name.insert(name.to_string(), idx);

        (idx, true)
    }

    /// Returns `true` if `name` has been discovered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns the name of a discovered type.
    #[must_use]
    pub fn name(&self, idx: TypeIdx) -> &str {
        &self.types[idx.0].name
    }

    /// Returns the discovered types assignable to `name`, in discovery
    /// order.
    #[must_use]
    pub fn subclasses_of(&self, name: &str) -> Vec<&str> {
        self.by_name
            .get(name)
            .map(|idx| {
                self.types[idx.0].subclasses
                                 .iter()
                                 .map(|sub| self.name(*sub))
                                 .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the discovered types `idx` is assignable to, in discovery
    /// order.
    #[must_use]
    pub fn known_supertypes(&self, idx: TypeIdx) -> Vec<&str> {
        self.types
            .iter()
            .filter(|known| known.subclasses.contains(&idx))
            .map(|known| known.name.as_str())
            .collect()
    }

    /// The number of discovered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type has been discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
