use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{
    error::RuntimeError,
    interpreter::{
        registry::{
            handle::{CallableHandle, HandleKind},
            imports::ImportTable,
        },
        types::{
            catalog::{MemberKey, TypeCatalog},
            discovery::SubclassIndex,
            signature::Signature,
        },
        value::core::Value,
    },
};

/// Label used in messages for the operation of a constructor.
pub const CONSTRUCTOR_LABEL: &str = "<init>";

/// The handles of one (type, operation) pair, keyed by arity.
pub type Bucket = BTreeMap<usize, Vec<CallableHandle>>;

/// Registers callable handles by textual signature and invokes them by
/// trial overload resolution.
///
/// Each document owns one registry. Type names written in the document are
/// resolved through the import table, the catalog, and the implicit
/// packages; the first resolution of a type discovers it in the subclass
/// index, which is what virtual registrations propagate through.
#[derive(Debug)]
pub struct CallRegistry {
    catalog:           TypeCatalog,
    imports:           ImportTable,
    index:             SubclassIndex,
    implicit_packages: Vec<String>,
    handles:           FxHashMap<MemberKey, Bucket>,
}

impl CallRegistry {
    /// Creates an empty registry over `catalog`.
    ///
    /// Names that are neither imported nor fully qualified are looked up in
    /// each of `implicit_packages` in order.
    #[must_use]
    pub fn new(catalog: TypeCatalog, implicit_packages: &[String]) -> Self {
        Self { catalog,
               imports: ImportTable::new(),
               index: SubclassIndex::new(),
               implicit_packages: implicit_packages.to_vec(),
               handles: FxHashMap::default() }
    }

    /// The catalog handles are resolved against.
    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// The types discovered so far.
    #[must_use]
    pub const fn index(&self) -> &SubclassIndex {
        &self.index
    }

    /// Imports a fully-qualified type under its short name and discovers it.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnresolvableType` if the catalog does not
    /// declare `name`, or `RuntimeError::AmbiguousImport` if the short name
    /// already refers to another type.
    pub fn import_type(&mut self, name: &str) -> Result<String, RuntimeError> {
        if !self.catalog.contains(name) {
            return Err(RuntimeError::UnresolvableType { name: name.to_string() });
        }

        let qualified = self.imports.insert(name)?.to_string();
        debug!(import = %qualified, "imported type");
        self.discover(&qualified);

        Ok(qualified)
    }

    /// Returns the fully-qualified name `name` refers to without discovering
    /// it.
    ///
    /// Imports are consulted first, then the exact catalog name, then each
    /// implicit package.
    #[must_use]
    pub fn lookup_type(&self, name: &str) -> Option<String> {
        if let Some(qualified) = self.imports.get(name) {
            return Some(qualified.to_string());
        }
        if self.catalog.contains(name) {
            return Some(name.to_string());
        }

        self.implicit_packages
            .iter()
            .map(|package| format!("{package}.{name}"))
            .find(|candidate| self.catalog.contains(candidate))
    }

    /// Resolves `name` to a fully-qualified type and discovers it.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnresolvableType` if the name cannot be
    /// resolved.
    pub fn resolve_type(&mut self, name: &str) -> Result<String, RuntimeError> {
        let qualified = self.lookup_type(name)
                            .ok_or_else(|| RuntimeError::UnresolvableType { name:
                                                                                name.to_string() })?;
        self.discover(&qualified);

        Ok(qualified)
    }

    /// Discovers a type, giving it copies of the virtual handles of every
    /// previously discovered supertype.
    fn discover(&mut self, qualified: &str) {
        let (idx, new) = self.index.discover(qualified, &self.catalog);
        if !new {
            return;
        }

        let supertypes: Vec<String> =
            self.index.known_supertypes(idx).into_iter().map(str::to_string).collect();
        let inherited: Vec<CallableHandle> =
            self.handles
                .iter()
                .filter(|(key, _)| key.member.is_some() && supertypes.contains(&key.type_name))
                .flat_map(|(_, bucket)| bucket.values().flatten())
                .filter(|handle| handle.kind == HandleKind::Virtual)
                .cloned()
                .collect();

        for handle in inherited {
            if self.insert(qualified, handle.clone()) {
                debug!(target_type = qualified, handle = %handle, "propagated virtual handle");
            }
        }
    }

    /// Registers a constructor of `type_name` taking `params`.
    ///
    /// Returns `false` if an identical handle was already registered.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnresolvableType` if a type cannot be resolved,
    /// `RuntimeError::MalformedSignature` if a signature is invalid, and
    /// `RuntimeError::NoSuchMember` if the catalog has no matching native.
    pub fn register_constructor(&mut self,
                                type_name: &str,
                                params: &str,
                                narrowed: Option<&str>)
                                -> Result<bool, RuntimeError> {
        self.register(HandleKind::Constructor, type_name, None, params, narrowed)
    }

    /// Registers the static operation `operation` of `type_name`.
    ///
    /// # Errors
    /// See [`CallRegistry::register_constructor`].
    pub fn register_static(&mut self,
                           type_name: &str,
                           operation: &str,
                           params: &str,
                           narrowed: Option<&str>)
                           -> Result<bool, RuntimeError> {
        self.register(HandleKind::Static, type_name, Some(operation), params, narrowed)
    }

    /// Registers the virtual operation `operation` of `type_name` and
    /// propagates it to every known subclass.
    ///
    /// # Errors
    /// See [`CallRegistry::register_constructor`].
    pub fn register_virtual(&mut self,
                            type_name: &str,
                            operation: &str,
                            params: &str,
                            narrowed: Option<&str>)
                            -> Result<bool, RuntimeError> {
        self.register(HandleKind::Virtual, type_name, Some(operation), params, narrowed)
    }

    fn register(&mut self,
                kind: HandleKind,
                type_name: &str,
                operation: Option<&str>,
                params: &str,
                narrowed: Option<&str>)
                -> Result<bool, RuntimeError> {
        let qualified = self.resolve_type(type_name)?;
        let declared = Signature::parse(params, &mut |name: &str| self.resolve_type(name).ok())?;

        let native = match (kind, operation) {
            (HandleKind::Constructor, _) => self.catalog.find_constructor(&qualified, &declared),
            (HandleKind::Static, Some(op)) => self.catalog.find_static(&qualified, op, &declared),
            (HandleKind::Virtual, Some(op)) => {
                self.catalog.find_instance(&qualified, op, &declared)
            },
            _ => None,
        };
        let Some(native) = native else {
            return Err(RuntimeError::NoSuchMember { type_name: qualified,
                                                    member:    operation.unwrap_or(CONSTRUCTOR_LABEL)
                                                                        .to_string(),
                                                    signature: declared.to_string(), });
        };
        let func = native.func.clone();

        let external = match narrowed {
            Some(text) => {
                let external = Signature::parse(text, &mut |name: &str| self.resolve_type(name).ok())?;
                if external.arity() != declared.arity() {
                    return Err(RuntimeError::MalformedSignature {
                        signature: text.to_string(),
                        reason:    format!("expected {} parameters to match {declared}",
                                           declared.arity()),
                    });
                }
                external
            },
            None => declared.clone(),
        };

        let handle = CallableHandle::new(&qualified, operation, kind, declared, external, func);
        let inserted = self.insert(&qualified, handle.clone());
        debug!(handle = %handle, inserted, "registered handle");

        if kind == HandleKind::Virtual {
            let subclasses: Vec<String> =
                self.index.subclasses_of(&qualified).into_iter().map(str::to_string).collect();
            for subclass in subclasses {
                if self.insert(&subclass, handle.clone()) {
                    debug!(target_type = %subclass, handle = %handle, "propagated virtual handle");
                }
            }
        }

        Ok(inserted)
    }

    /// Files `handle` in the bucket of `type_name` unless a handle with the
    /// same external parameters is already there.
    fn insert(&mut self, type_name: &str, handle: CallableHandle) -> bool {
        let key = MemberKey::new(type_name, handle.name.as_deref());
        let candidates = self.handles
                             .entry(key)
                             .or_default()
                             .entry(handle.arity())
                             .or_default();

        if candidates.iter().any(|existing| existing.external.same_params(&handle.external)) {
            return false;
        }

        candidates.push(handle);
        true
    }

    /// Invokes `operation` of `type_name`, or its constructor if
    /// `operation` is `None`.
    ///
    /// Candidate arities are tried from `args.len()` down to zero, and the
    /// handles of each arity in registration order. The result of the first
    /// handle that accepts the arguments is returned.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnresolvableType` if the type cannot be
    /// resolved, `RuntimeError::NoHandle` if nothing is registered for the
    /// pair, and `RuntimeError::NoMatchingOverload` if every candidate
    /// failed.
    pub fn invoke(&mut self,
                  type_name: &str,
                  operation: Option<&str>,
                  args: &[Value])
                  -> Result<Value, RuntimeError> {
        self.invoke_matching(type_name, operation, args, |_| true)
    }

    /// Like [`CallRegistry::invoke`], but only tries virtual handles, so
    /// `args[0]` is always treated as the receiver.
    ///
    /// # Errors
    /// See [`CallRegistry::invoke`].
    pub fn invoke_virtual(&mut self,
                          type_name: &str,
                          operation: &str,
                          args: &[Value])
                          -> Result<Value, RuntimeError> {
        self.invoke_matching(type_name, Some(operation), args, |handle| {
                                 handle.kind == HandleKind::Virtual
                             })
    }

    /// Like [`CallRegistry::invoke`], but skips virtual handles.
    ///
    /// # Errors
    /// See [`CallRegistry::invoke`].
    pub fn invoke_static(&mut self,
                         type_name: &str,
                         operation: &str,
                         args: &[Value])
                         -> Result<Value, RuntimeError> {
        self.invoke_matching(type_name, Some(operation), args, |handle| {
                                 handle.kind != HandleKind::Virtual
                             })
    }

    fn invoke_matching(&mut self,
                       type_name: &str,
                       operation: Option<&str>,
                       args: &[Value],
                       accept: impl Fn(&CallableHandle) -> bool)
                       -> Result<Value, RuntimeError> {
        let qualified = self.resolve_type(type_name)?;
        let label = operation.unwrap_or(CONSTRUCTOR_LABEL);

        let bucket = self.handles
                         .get(&MemberKey::new(&qualified, operation))
                         .ok_or_else(|| RuntimeError::NoHandle { type_name: qualified.clone(),
                                                                 operation: label.to_string(), })?;

        for arity in (0..=args.len()).rev() {
            for handle in bucket.get(&arity).into_iter().flatten().filter(|h| accept(h)) {
                match handle.invoke(args, &self.catalog) {
                    Ok(value) => return Ok(value),
                    Err(failure) => trace!(handle = %handle, %failure, "candidate rejected"),
                }
            }
        }

        let argument_types = args.iter().map(Value::type_name).collect::<Vec<_>>().join(", ");

        Err(RuntimeError::NoMatchingOverload { type_name: qualified,
                                               operation: label.to_string(),
                                               argument_types })
    }

    /// Returns the handles registered for the pair, in trial order for a
    /// call with `max_arity` arguments.
    #[must_use]
    pub fn candidates(&self,
                      type_name: &str,
                      operation: Option<&str>,
                      max_arity: usize)
                      -> Vec<&CallableHandle> {
        let Some(qualified) = self.lookup_type(type_name) else {
            return Vec::new();
        };
        let Some(bucket) = self.handles.get(&MemberKey::new(&qualified, operation)) else {
            return Vec::new();
        };

        bucket.range(..=max_arity).rev().flat_map(|(_, handles)| handles).collect()
    }
}
