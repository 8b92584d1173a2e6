// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

use super::ty;
use super::ty::Method;
use super::ty::TypeRef;

// Superclasses appear before their subclasses so that each superclass can be
// resolved when its subclass is registered.
const CORE_CLASSES: &[(&str, &str)] = &[
    ("Module", "Object"),
    ("Class", "Module"),

    ("NilClass", "Object"),
    ("TrueClass", "Object"),
    ("FalseClass", "Object"),

    ("Numeric", "Object"),
    ("Integer", "Numeric"),
    ("Float", "Numeric"),

    ("String", "Object"),
    ("Symbol", "Object"),
    ("Array", "Object"),
    ("Hash", "Object"),
    ("Range", "Object"),
    ("Regexp", "Object"),
    ("Set", "Object"),
    ("Struct", "Object"),

    ("Proc", "Object"),
    ("Method", "Object"),

    ("Enumerator", "Object"),
    ("Enumerator::Lazy", "Enumerator"),

    ("Exception", "Object"),
    ("StandardError", "Exception"),
    ("ArgumentError", "StandardError"),
    ("IOError", "StandardError"),
    ("NameError", "StandardError"),
    ("RuntimeError", "StandardError"),
    ("FrozenError", "RuntimeError"),
    ("TypeError", "StandardError"),

    ("IO", "Object"),
    ("File", "IO"),
    ("Dir", "Object"),

    ("Time", "Object"),
    ("Thread", "Object"),
    ("Mutex", "Object"),
];

const CORE_MODULES: &[&str] = &[
    "Comparable",
    "Enumerable",
    "GC",
    "IO::generic_readable",
    "IO::generic_writable",
    "Kernel",
    "Loader",
    "Loader::Source",
    "Math",
    "ObjectSpace",
    "Process",
];

const CORE_METHODS: &[(&str, &str)] = &[
    ("Object", "class"),
    ("Object", "clone"),
    ("Object", "inspect"),
    ("String", "length"),
    ("String", "slice"),
    ("String", "upcase"),
    ("Array", "length"),
    ("Array", "pop"),
    ("Array", "push"),
    ("Hash", "fetch"),
    ("Hash", "store"),
    ("Kernel", "print"),
    ("Kernel", "require"),
];

// `register` binds the built-in types under `root`, which is expected to be
// the freshly created root class of a new runtime.
pub fn register(root: &TypeRef) {
    // The root class is reachable under its own name.
    bind(root, "Object", root.clone());

    for (name, parent) in CORE_CLASSES {
        let parent_ty = resolve(root, parent);
        bind(root, name, ty::new_class(name, Some(parent_ty)));
    }

    #[cfg(feature = "bignum")]
    bind(
        root,
        "BigNum",
        ty::new_class("BigNum", Some(resolve(root, "Numeric"))),
    );

    for name in CORE_MODULES {
        bind(root, name, ty::new_module(name));
    }

    for (name, method) in CORE_METHODS {
        let ty = resolve(root, name);
        let mut unlocked_ty = ty.lock().unwrap();

        unlocked_ty.methods
            .insert((*method).to_string(), Method{defined_at: None});
    }
}

fn bind(root: &TypeRef, name: &str, ty: TypeRef) {
    let segments: Vec<&str> = name.split("::").collect();

    let (last, owner_path) = segments.split_last()
        .expect("a built-in type name shouldn't be empty");

    let owner = ty::lookup_path(root, owner_path)
        .expect("the owner of a built-in type should already be registered");

    owner.lock().unwrap().consts.insert((*last).to_string(), ty);
}

fn resolve(root: &TypeRef, name: &str) -> TypeRef {
    let segments: Vec<&str> = name.split("::").collect();

    ty::lookup_path(root, &segments)
        .expect("the superclass of a built-in type should already be \
                 registered")
}
