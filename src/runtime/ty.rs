// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;

// We use a wildcard import for `error` to import the many error variant
// constructors created by Snafu.
#[allow(clippy::wildcard_imports)]
use super::error::*;
use super::error::Error;
use crate::ast::Location;

pub type TypeRef = Arc<Mutex<Type>>;

pub struct Type {
    // `name` is the full constant path of the type, e.g. `Loader::Source`.
    pub name: String,
    pub kind: TypeKind,

    // `consts` holds the types bound under this type's namespace, keyed by
    // the final segment of their constant path. We use a `BTreeMap` in order
    // to get a deterministic order when iterating over bound constants.
    pub consts: BTreeMap<String, TypeRef>,
    pub methods: BTreeMap<String, Method>,

    frozen: bool,
}

#[derive(Clone)]
pub enum TypeKind {
    // `parent` is `None` only for the root class.
    Class{parent: Option<TypeRef>},
    Module,
}

#[derive(Clone, Debug)]
pub struct Method {
    // `defined_at` is `None` for built-in methods.
    pub defined_at: Option<Location>,
}

pub fn new_class(name: &str, parent: Option<TypeRef>) -> TypeRef {
    new_type(name, TypeKind::Class{parent})
}

pub fn new_module(name: &str) -> TypeRef {
    new_type(name, TypeKind::Module)
}

fn new_type(name: &str, kind: TypeKind) -> TypeRef {
    Arc::new(Mutex::new(Type{
        name: name.to_string(),
        kind,
        consts: BTreeMap::new(),
        methods: BTreeMap::new(),
        frozen: false,
    }))
}

impl Type {
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TypeKind::Class{..} => "class",
            TypeKind::Module => "module",
        }
    }

    pub fn frozen(&self) -> bool {
        self.frozen
    }

    // `freeze` makes this type's structure permanently immutable. Freezing
    // an already-frozen type is a no-op.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn define_const(&mut self, name: &str, ty: TypeRef)
        -> Result<(), Error>
    {
        self.check_not_frozen()?;

        self.consts.insert(name.to_string(), ty);

        Ok(())
    }

    // `define_method` adds `method` under `name`, replacing any method
    // already defined under `name`.
    pub fn define_method(&mut self, name: &str, method: Method)
        -> Result<(), Error>
    {
        self.check_not_frozen()?;

        self.methods.insert(name.to_string(), method);

        Ok(())
    }

    pub fn remove_method(&mut self, name: &str) -> Result<(), Error> {
        self.check_not_frozen()?;

        if self.methods.remove(name).is_none() {
            return UndefinedMethod{
                name: self.name.clone(),
                method: name.to_string(),
            }.fail();
        }

        Ok(())
    }

    fn check_not_frozen(&self) -> Result<(), Error> {
        if self.frozen {
            return FrozenType{
                kind: self.kind_name().to_string(),
                name: self.name.clone(),
            }.fail();
        }

        Ok(())
    }
}

// `consts` can contain reference cycles (the root class is bound under its
// own namespace), so this implementation doesn't descend into bound
// constants.
impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("kind", &self.kind_name())
            .field("frozen", &self.frozen)
            .finish()
    }
}

pub fn ref_eq(a: &TypeRef, b: &TypeRef) -> bool {
    Arc::ptr_eq(a, b)
}

// `lookup_path` resolves `segments` against the constants bound under
// `root`, returning `None` if any segment is unbound.
pub fn lookup_path(root: &TypeRef, segments: &[&str]) -> Option<TypeRef> {
    let mut cur = root.clone();
    for segment in segments {
        let next = cur.lock().unwrap().consts.get(*segment).cloned()?;
        cur = next;
    }

    Some(cur)
}
