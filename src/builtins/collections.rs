use std::fmt;

use crate::{
    builtins::{arg, arg_int, arg_object, index_in, int_value, natives},
    interpreter::{
        types::catalog::TypeCatalog,
        value::{
            core::{Value, write_list},
            object::ObjectRef,
        },
    },
};

/// `java.util.Collection`
pub const COLLECTION_TYPE: &str = "java.util.Collection";
/// `java.util.List`
pub const LIST_TYPE: &str = "java.util.List";
/// `java.util.ArrayList`
pub const ARRAY_LIST_TYPE: &str = "java.util.ArrayList";
/// `java.util.LinkedList`
pub const LINKED_LIST_TYPE: &str = "java.util.LinkedList";

/// Most slots reserved up front by `ArrayList(int)`; larger requests grow on
/// demand.
const INITIAL_CAPACITY_LIMIT: usize = 1024;

/// State shared by every list implementation; prints as `[a, b]`.
#[derive(Debug, Default)]
pub struct ListState {
    /// The elements in order.
    pub items: Vec<Value>,
}

impl fmt::Display for ListState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.items)
    }
}

/// Declares the collection interfaces and list classes.
pub fn declare(catalog: &mut TypeCatalog) {
    catalog.declare_type(COLLECTION_TYPE, &[]);
    catalog.declare_type(LIST_TYPE, &[COLLECTION_TYPE]);
    catalog.declare_type(ARRAY_LIST_TYPE, &[LIST_TYPE]);
    catalog.declare_type(LINKED_LIST_TYPE, &[LIST_TYPE]);
}

natives! {
    NATIVES {
        Instance "java.util.Collection" . "add" "(Object)" => collection_add,
        Instance "java.util.Collection" . "size" "()" => collection_size,
        Instance "java.util.Collection" . "isEmpty" "()" => collection_is_empty,
        Instance "java.util.Collection" . "contains" "(Object)" => collection_contains,
        Instance "java.util.Collection" . "clear" "()" => collection_clear,

        Instance "java.util.List" . "add" "(int, Object)" => list_insert,
        Instance "java.util.List" . "get" "(int)" => list_get,
        Instance "java.util.List" . "set" "(int, Object)" => list_set,
        Instance "java.util.List" . "remove" "(int)" => list_remove,

        Constructor "java.util.ArrayList" "()" => array_list_new,
        Constructor "java.util.ArrayList" "(int)" => array_list_with_capacity,
        Constructor "java.util.ArrayList" "(Collection)" => array_list_copy,

        Constructor "java.util.LinkedList" "()" => linked_list_new,
        Instance "java.util.LinkedList" . "addFirst" "(Object)" => linked_list_add_first,
    }
}

/// Runs `f` on the list state of the receiver.
fn with_list<R>(args: &[Value], f: impl FnOnce(&mut ListState) -> R) -> Result<R, String> {
    let receiver = arg_object(args, 0)?;
    receiver.with_mut(f)
            .ok_or_else(|| format!("{} is not a list", receiver.class()))
}

fn collection_add(args: &[Value]) -> Result<Value, String> {
    let item = arg(args, 1)?.clone();
    with_list(args, |list| list.items.push(item))?;
    Ok(Value::Bool(true))
}

fn collection_size(args: &[Value]) -> Result<Value, String> {
    int_value(with_list(args, |list| list.items.len())?)
}

fn collection_is_empty(args: &[Value]) -> Result<Value, String> {
    with_list(args, |list| Value::Bool(list.items.is_empty()))
}

fn collection_contains(args: &[Value]) -> Result<Value, String> {
    let item = arg(args, 1)?;
    with_list(args, |list| Value::Bool(list.items.contains(item)))
}

fn collection_clear(args: &[Value]) -> Result<Value, String> {
    with_list(args, |list| list.items.clear())?;
    Ok(Value::Null)
}

fn list_insert(args: &[Value]) -> Result<Value, String> {
    let index = arg_int(args, 1)?;
    let item = arg(args, 2)?.clone();
    with_list(args, |list| {
        let at = index_in(index, list.items.len() + 1)?;
        list.items.insert(at, item);
        Ok(Value::Null)
    })?
}

fn list_get(args: &[Value]) -> Result<Value, String> {
    let index = arg_int(args, 1)?;
    with_list(args, |list| {
        index_in(index, list.items.len()).map(|at| list.items[at].clone())
    })?
}

fn list_set(args: &[Value]) -> Result<Value, String> {
    let index = arg_int(args, 1)?;
    let item = arg(args, 2)?.clone();
    with_list(args, |list| {
        let at = index_in(index, list.items.len())?;
        Ok(std::mem::replace(&mut list.items[at], item))
    })?
}

fn list_remove(args: &[Value]) -> Result<Value, String> {
    let index = arg_int(args, 1)?;
    with_list(args, |list| index_in(index, list.items.len()).map(|at| list.items.remove(at)))?
}

fn array_list_new(_: &[Value]) -> Result<Value, String> {
    Ok(Value::from(ObjectRef::new(ARRAY_LIST_TYPE, ListState::default())))
}

fn array_list_with_capacity(args: &[Value]) -> Result<Value, String> {
    let capacity = arg_int(args, 0)?;
    let capacity = usize::try_from(capacity).map_err(|_| format!("Illegal Capacity: {capacity}"))?;
    let state = ListState { items: Vec::with_capacity(capacity.min(INITIAL_CAPACITY_LIMIT)) };
    Ok(Value::from(ObjectRef::new(ARRAY_LIST_TYPE, state)))
}

fn array_list_copy(args: &[Value]) -> Result<Value, String> {
    let source = arg_object(args, 0)?;
    let items = source.with(|list: &ListState| list.items.clone())
                      .ok_or_else(|| format!("{} is not a collection", source.class()))?;
    Ok(Value::from(ObjectRef::new(ARRAY_LIST_TYPE, ListState { items })))
}

fn linked_list_new(_: &[Value]) -> Result<Value, String> {
    Ok(Value::from(ObjectRef::new(LINKED_LIST_TYPE, ListState::default())))
}

fn linked_list_add_first(args: &[Value]) -> Result<Value, String> {
    let item = arg(args, 1)?.clone();
    with_list(args, |list| list.items.insert(0, item))?;
    Ok(Value::Null)
}
