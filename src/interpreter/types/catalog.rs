use std::{collections::VecDeque, fmt, rc::Rc};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    error::RuntimeError,
    interpreter::{
        types::signature::{Primitive, Signature, TypeRef},
        value::core::{
            BOOLEAN_TYPE, BYTE_TYPE, CHAR_SEQUENCE_TYPE, CHARACTER_TYPE, DOUBLE_TYPE, FLOAT_TYPE,
            INTEGER_TYPE, LONG_TYPE, NUMBER_TYPE, OBJECT_TYPE, SHORT_TYPE, STRING_TYPE, Value,
        },
    },
};

/// A native implementation filed in the catalog.
///
/// Instance members receive the receiver as the first argument. Failures
/// are reported as a message and treated by the registry as a failed
/// overload candidate.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Value, String>>;

/// The role a native member plays on its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Creates a new instance of the type.
    Constructor,
    /// Called without a receiver.
    Static,
    /// Called with a receiver and dispatched on its runtime type.
    Instance,
}

/// Identifies the member table of one type.
///
/// Constructors are filed under `member: None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
    /// The fully-qualified type name.
    pub type_name: String,
    /// The member name, or `None` for constructors.
    pub member:    Option<String>,
}

impl MemberKey {
    /// Creates a key for `type_name` and `member`.
    #[must_use]
    pub fn new(type_name: &str, member: Option<&str>) -> Self {
        Self { type_name: type_name.to_string(),
               member:    member.map(str::to_string), }
    }
}

/// A native implementation together with its resolved signature.
#[derive(Clone)]
pub struct NativeMember {
    /// Whether the member is a constructor, static or instance member.
    pub kind:      MemberKind,
    /// The resolved parameter list, excluding any receiver.
    pub signature: Signature,
    /// The implementation.
    pub func:      NativeFn,
}

impl fmt::Debug for NativeMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeMember")
         .field("kind", &self.kind)
         .field("signature", &self.signature)
         .finish_non_exhaustive()
    }
}

/// The host-side registry of types and native members.
///
/// A catalog is what a document's declarations are resolved against. Every
/// catalog knows the root object type and the value types; everything else
/// is declared by the host before a document is loaded.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    types:   FxHashMap<String, Vec<String>>,
    members: FxHashMap<MemberKey, Vec<NativeMember>>,
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCatalog {
    /// Creates a catalog containing only the root object type and the value
    /// types.
    #[must_use]
    pub fn new() -> Self {
        let mut catalog = Self { types:   FxHashMap::default(),
                                 members: FxHashMap::default(), };

        catalog.types.insert(OBJECT_TYPE.to_string(), Vec::new());
        catalog.declare_type(CHAR_SEQUENCE_TYPE, &[]);
        catalog.declare_type(STRING_TYPE, &[CHAR_SEQUENCE_TYPE]);
        catalog.declare_type(BOOLEAN_TYPE, &[]);
        catalog.declare_type(CHARACTER_TYPE, &[]);
        catalog.declare_type(NUMBER_TYPE, &[]);
        for boxed in [BYTE_TYPE, SHORT_TYPE, INTEGER_TYPE, LONG_TYPE, FLOAT_TYPE, DOUBLE_TYPE] {
            catalog.declare_type(boxed, &[NUMBER_TYPE]);
        }

        catalog
    }

    /// Declares `name` with the given direct supertypes.
    ///
    /// A type declared without supertypes extends the root object type.
    /// Declaring a type again adds the new supertypes to the existing ones.
    pub fn declare_type(&mut self, name: &str, supertypes: &[&str]) {
        let mut direct: Vec<String> = supertypes.iter().map(ToString::to_string).collect();
        if direct.is_empty() && name != OBJECT_TYPE {
            direct.push(OBJECT_TYPE.to_string());
        }

        let entry = self.types.entry(name.to_string()).or_default();
        for supertype in direct {
            if !entry.contains(&supertype) {
                entry.push(supertype);
            }
        }
    }

    /// Files a constructor for `type_name`.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnresolvableType` if `type_name` was not
    /// declared, or `RuntimeError::MalformedSignature` if the signature
    /// cannot be resolved.
    pub fn define_constructor<F>(&mut self,
                                 type_name: &str,
                                 signature: &str,
                                 func: F)
                                 -> Result<(), RuntimeError>
        where F: Fn(&[Value]) -> Result<Value, String> + 'static
    {
        self.define(MemberKind::Constructor, type_name, None, signature, Rc::new(func))
    }

    /// Files a static member `name` for `type_name`.
    ///
    /// # Errors
    /// See [`TypeCatalog::define_constructor`].
    pub fn define_static<F>(&mut self,
                            type_name: &str,
                            name: &str,
                            signature: &str,
                            func: F)
                            -> Result<(), RuntimeError>
        where F: Fn(&[Value]) -> Result<Value, String> + 'static
    {
        self.define(MemberKind::Static, type_name, Some(name), signature, Rc::new(func))
    }

    /// Files an instance member `name` for `type_name`.
    ///
    /// The receiver is passed as `args[0]`; the signature lists only the
    /// remaining parameters.
    ///
    /// # Errors
    /// See [`TypeCatalog::define_constructor`].
    pub fn define_instance<F>(&mut self,
                              type_name: &str,
                              name: &str,
                              signature: &str,
                              func: F)
                              -> Result<(), RuntimeError>
        where F: Fn(&[Value]) -> Result<Value, String> + 'static
    {
        self.define(MemberKind::Instance, type_name, Some(name), signature, Rc::new(func))
    }

    fn define(&mut self,
              kind: MemberKind,
              type_name: &str,
              name: Option<&str>,
              signature: &str,
              func: NativeFn)
              -> Result<(), RuntimeError> {
        if !self.contains(type_name) {
            return Err(RuntimeError::UnresolvableType { name: type_name.to_string() });
        }

        let signature = Signature::parse(signature, &mut |n: &str| self.resolve_name(n))?;
        let members = self.members.entry(MemberKey::new(type_name, name)).or_default();

        members.retain(|member| member.kind != kind || !member.signature.same_params(&signature));
        members.push(NativeMember { kind,
                                    signature,
                                    func });

        Ok(())
    }

    /// Returns `true` if `name` is a declared type.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Resolves a written type name to a declared fully-qualified name.
    ///
    /// The name is accepted as-is if it is declared; otherwise it is matched
    /// against the last segment of every declared name and accepted if
    /// exactly one matches.
    #[must_use]
    pub fn resolve_name(&self, name: &str) -> Option<String> {
        if self.contains(name) {
            return Some(name.to_string());
        }

        let mut matches = self.types
                              .keys()
                              .filter(|declared| declared.rsplit('.').next() == Some(name));
        let first = matches.next()?;

        matches.next().is_none().then(|| first.clone())
    }

    /// Returns the direct supertypes of a declared type.
    #[must_use]
    pub fn supertypes(&self, name: &str) -> &[String] {
        self.types.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns every declared supertype of `name`, nearest first, without
    /// `name` itself.
    #[must_use]
    pub fn ancestors(&self, name: &str) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut queue: VecDeque<&str> = self.supertypes(name).iter().map(String::as_str).collect();
        let mut ancestors = Vec::new();

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            ancestors.push(current.to_string());
            queue.extend(self.supertypes(current).iter().map(String::as_str));
        }

        ancestors
    }

    /// Returns `true` if a value of type `from` may be used where `to` is
    /// expected.
    ///
    /// # Example
    /// ```
    /// use interplay::interpreter::types::catalog::TypeCatalog;
    ///
    /// let catalog = TypeCatalog::new();
    ///
    /// assert!(catalog.is_assignable("java.lang.Integer", "java.lang.Number"));
    /// assert!(catalog.is_assignable("java.lang.String", "java.lang.Object"));
    /// assert!(!catalog.is_assignable("java.lang.String", "java.lang.Number"));
    /// ```
    #[must_use]
    pub fn is_assignable(&self, from: &str, to: &str) -> bool {
        from == to || to == OBJECT_TYPE || self.ancestors(from).iter().any(|a| a == to)
    }

    /// Finds the constructor of `type_name` taking exactly `params`.
    #[must_use]
    pub fn find_constructor(&self, type_name: &str, params: &Signature) -> Option<&NativeMember> {
        self.find_exact(&MemberKey::new(type_name, None), MemberKind::Constructor, params)
    }

    /// Finds the static member `name` of `type_name` taking exactly `params`.
    #[must_use]
    pub fn find_static(&self,
                       type_name: &str,
                       name: &str,
                       params: &Signature)
                       -> Option<&NativeMember> {
        self.find_exact(&MemberKey::new(type_name, Some(name)), MemberKind::Static, params)
    }

    /// Finds the most specific instance member `name` for a receiver of
    /// type `type_name`.
    ///
    /// The type itself is searched first, then its supertypes breadth-first.
    #[must_use]
    pub fn find_instance(&self,
                         type_name: &str,
                         name: &str,
                         params: &Signature)
                         -> Option<&NativeMember> {
        std::iter::once(type_name.to_string()).chain(self.ancestors(type_name))
                                              .find_map(|candidate| {
                                                  let key = MemberKey::new(&candidate, Some(name));
                                                  self.find_exact(&key, MemberKind::Instance, params)
                                              })
    }

    fn find_exact(&self,
                  key: &MemberKey,
                  kind: MemberKind,
                  params: &Signature)
                  -> Option<&NativeMember> {
        self.members
            .get(key)?
            .iter()
            .find(|member| member.kind == kind && member.signature.same_params(params))
    }

    /// Converts `value` for a parameter of type `target`.
    ///
    /// Numeric values are widened to numeric primitives, class parameters
    /// accept any assignable value or `null`, and array parameters coerce
    /// each element. Returns `None` if the value does not fit.
    ///
    /// # Example
    /// ```
    /// use interplay::{
    ///     interpreter::{
    ///         types::{catalog::TypeCatalog, signature::{Primitive, TypeRef}},
    ///         value::core::Value,
    ///     },
    ///     util::num::NumKind,
    /// };
    ///
    /// let catalog = TypeCatalog::new();
    /// let long = TypeRef::Primitive(Primitive::Numeric(NumKind::Long));
    ///
    /// assert_eq!(catalog.coerce(&Value::Int(2), &long), Some(Value::Long(2)));
    /// assert_eq!(catalog.coerce(&Value::from("2"), &long), None);
    /// ```
    #[must_use]
    pub fn coerce(&self, value: &Value, target: &TypeRef) -> Option<Value> {
        match target {
            TypeRef::Primitive(Primitive::Numeric(kind)) => value.widen(*kind),
            TypeRef::Primitive(Primitive::Boolean) => {
                matches!(value, Value::Bool(_)).then(|| value.clone())
            },
            TypeRef::Primitive(Primitive::Char) => {
                matches!(value, Value::Char(_)).then(|| value.clone())
            },
            TypeRef::Class(name) => match value {
                Value::Null => Some(Value::Null),
                _ if self.is_assignable(value.type_name(), name) => Some(value.clone()),
                _ => None,
            },
            TypeRef::Array(element) => match value {
                Value::Null => Some(Value::Null),
                Value::Array(items) => items.iter()
                                            .map(|item| self.coerce(item, element))
                                            .collect::<Option<Vec<_>>>()
                                            .map(Value::from),
                _ => None,
            },
        }
    }
}
