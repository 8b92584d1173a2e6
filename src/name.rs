// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

use snafu::OptionExt;

// We use a wildcard import for `error` to import the many error variant
// constructors created by Snafu.
#[allow(clippy::wildcard_imports)]
use crate::runtime::error::*;
use crate::runtime::error::Error;
use crate::runtime::ty::TypeRef;
use crate::runtime::Runtime;

// `ARGV_CLASS` names the type of the script-arguments stream. That type
// isn't bound to a constant in the root namespace, so the name is handled as
// a literal instead of being parsed as a constant path.
pub const ARGV_CLASS: &str = "argv.class";

// `resolve` returns the live type that `name` refers to in `runtime`. The
// name is validated before any lookup is attempted; this is the only gate
// between caller-supplied strings and the constant tables, so the validation
// must stay ahead of the lookup.
pub fn resolve(runtime: &Runtime, name: &str) -> Result<TypeRef, Error> {
    if name == ARGV_CLASS {
        return Ok(runtime.argv_class());
    }

    let segments = parse(name)?;

    runtime.lookup(&segments)
        .context(UnresolvedName{name: name.to_string()})
}

// `parse` splits `name` into its constant path segments, or returns
// `Error::InvalidName` if `name` doesn't follow the constant path grammar. A
// leading root marker (`::`) is accepted and discarded, because all
// resolution starts at the root namespace anyway.
pub fn parse(name: &str) -> Result<Vec<&str>, Error> {
    let path = name.strip_prefix("::").unwrap_or(name);

    let mut segments = vec![];
    for segment in path.split("::") {
        if !is_valid_segment(segment, segments.is_empty()) {
            return InvalidName{name: name.to_string()}.fail();
        }
        segments.push(segment);
    }

    Ok(segments)
}

// Note that segments after the first are allowed to begin with a lowercase
// letter, to support names like `IO::generic_readable`.
fn is_valid_segment(segment: &str, first_segment: bool) -> bool {
    let mut chars = segment.chars();

    let first_char =
        match chars.next() {
            Some(c) => c,
            None => return false,
        };

    let first_char_ok =
        if first_segment {
            first_char.is_ascii_uppercase()
        } else {
            first_char.is_ascii_alphabetic()
        };

    first_char_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;
    use crate::runtime::ty;

    #[test]
    fn test_parses_valid_names() {
        let tests = &[
            ("Object", vec!["Object"]),
            ("::File", vec!["File"]),
            ("IO::Buffer", vec!["IO", "Buffer"]),
            ("IO::generic_readable", vec!["IO", "generic_readable"]),
            ("A_1::b_2::C3", vec!["A_1", "b_2", "C3"]),
        ];

        for (name, exp_segments) in tests {
            let segments = parse(name)
                .unwrap_or_else(|e| {
                    panic!("couldn't parse '{name}': {e}");
                });

            assert_eq!(*exp_segments, segments);
        }
    }

    #[test]
    fn test_rejects_invalid_names() {
        let tests = &[
            "",
            "::",
            "object",
            "_Object",
            "9Lives",
            "Foo::",
            "::::Foo",
            "Foo:::Bar",
            "Foo::1Bar",
            "Foo.bar",
            "Foo Bar",
            "Foo-Bar",
        ];

        for name in tests {
            assert_matches!(
                parse(name),
                Err(Error::InvalidName{..}),
                "expected '{}' to be rejected",
                name,
            );
        }
    }

    #[test]
    fn test_resolves_core_types() {
        let runtime = Runtime::new();

        for name in &["Object", "String", "IO::generic_readable"] {
            resolve(&runtime, name)
                .unwrap_or_else(|e| {
                    panic!("couldn't resolve '{name}': {e}");
                });
        }
    }

    #[test]
    fn test_valid_unknown_names_are_unresolved() {
        let runtime = Runtime::new();

        assert_matches!(
            resolve(&runtime, "Widget"),
            Err(Error::UnresolvedName{..})
        );
    }

    #[test]
    fn test_invalid_names_are_rejected_before_lookup() {
        let runtime = Runtime::new();

        assert_matches!(
            resolve(&runtime, "widget"),
            Err(Error::InvalidName{..})
        );
    }

    #[test]
    fn test_argv_class_resolves_to_a_singleton() {
        let runtime = Runtime::new();

        let a = resolve(&runtime, ARGV_CLASS)
            .expect("'argv.class' should resolve");
        let b = resolve(&runtime, ARGV_CLASS)
            .expect("'argv.class' should resolve");

        assert!(ty::ref_eq(&a, &b));
        assert_eq!(ARGV_CLASS, a.lock().unwrap().name);

        // The literal bypasses the constant path grammar.
        assert_matches!(parse(ARGV_CLASS), Err(Error::InvalidName{..}));
    }
}
