// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

use std::path::Path;
use std::path::PathBuf;

use crate::name;
use crate::runtime::error::Error;
use crate::runtime::Runtime;

// `RUNTIME_VERSION` is the version of the runtime whose built-in types get
// catalogued, which is the version of this crate.
pub const RUNTIME_VERSION: &str = env!("CARGO_PKG_VERSION");

// `MAX_CATALOGUE_VERSION` is the newest version that has a type catalogue;
// newer runtimes use that catalogue.
pub const MAX_CATALOGUE_VERSION: u32 = 12;

// `LOADER_TYPE_NAMES` are the types that `check_require` never freezes.
// `require` records each loaded script on `Loader::Source`, so freezing the
// loader types would break `require` itself.
pub const LOADER_TYPE_NAMES: &[&str] = &["Loader", "Loader::Source"];

#[derive(Clone, Debug, Default)]
pub struct FreezeOpts {
    // `except` lists type names to leave mutable.
    pub except: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct CheckOpts {
    // `depends` lists scripts to load before freezing the core.
    pub depends: Vec<PathBuf>,
    // `modules` lists modules to define at the root before freezing the
    // core.
    pub modules: Vec<String>,
    // `classes` lists classes to define at the root before freezing the
    // core.
    pub classes: Vec<ClassSpec>,
    // `except` lists extra type names to leave mutable.
    pub except: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ClassSpec {
    pub name: String,
    // `parent` names the superclass; the root class is used if `parent` is
    // `None`.
    pub parent: Option<String>,
}

// `catalogue_type_names` returns the built-in type names catalogued for
// this runtime version, whether or not they resolve in this build.
pub fn catalogue_type_names() -> Vec<&'static str> {
    catalogue(version_int(RUNTIME_VERSION)).split_whitespace().collect()
}

// `version_int` converts a version string to the integer that keys the type
// catalogues: the digits of the version's first three characters, capped at
// `MAX_CATALOGUE_VERSION`.
fn version_int(version: &str) -> u32 {
    let digits: String =
        version.chars()
            .take(3)
            .filter(|c| c.is_ascii_digit())
            .collect();

    let n: u32 = digits.parse()
        .expect("a version string should start with 'major.minor' digits");

    if n > MAX_CATALOGUE_VERSION {
        MAX_CATALOGUE_VERSION
    } else {
        n
    }
}

fn catalogue(version: u32) -> &'static str {
    // Versions older than the oldest catalogue share its type list.
    match version {
        11 => include_str!("../module_names/11.txt"),
        12 => include_str!("../module_names/12.txt"),
        _ => include_str!("../module_names/10.txt"),
    }
}

impl Runtime {
    // `freeze_core` freezes every built-in type in this runtime's
    // catalogue, except the ones named in `opts.except`. Freezing an
    // already-frozen type is a no-op, so calling this twice is equivalent
    // to calling it once.
    pub fn freeze_core(&self, opts: &FreezeOpts) -> Result<(), Error> {
        let names: Vec<&str> =
            self.core_type_names()
                .iter()
                .copied()
                .filter(|n| !opts.except.iter().any(|e| e == n))
                .collect();

        for name in names {
            let ty = name::resolve(self, name)?;
            ty.lock().unwrap().freeze();
        }

        Ok(())
    }

    // `check_require` checks that loading the script at `path` doesn't
    // modify any built-in type: the core is frozen first, so a script that
    // modifies a built-in type fails with `Error::FrozenType` at the
    // offending statement. That error is propagated unmodified; its absence
    // is the check result.
    //
    // A script can't bind new top-level constants once the root class is
    // frozen, so any top-level names the script defines must be declared up
    // front with `opts.modules` and `opts.classes`.
    pub fn check_require(&self, path: &Path, opts: &CheckOpts)
        -> Result<(), Error>
    {
        for depend in &opts.depends {
            self.require(depend)?;
        }

        for module in &opts.modules {
            self.define_module(module)?;
        }

        for class in &opts.classes {
            self.define_class(&class.name, class.parent.as_deref())?;
        }

        let mut except: Vec<String> =
            LOADER_TYPE_NAMES.iter().map(|n| (*n).to_string()).collect();
        except.extend(opts.except.iter().cloned());

        self.freeze_core(&FreezeOpts{except})?;

        self.require(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_version_ints() {
        let tests = &[
            ("1.0.0", 10),
            ("1.1.9", 11),
            ("1.2.0", 12),
            // Only the first three characters are considered, so a minor
            // version above 9 is truncated to its first digit.
            ("1.10.3", 11),
            ("9.9.9", 12),
        ];

        for (version, exp_int) in tests {
            assert_eq!(
                *exp_int,
                version_int(version),
                "unexpected version integer for '{version}'",
            );
        }
    }

    #[test]
    fn test_catalogue_names_resolve() {
        let runtime = Runtime::new();

        for name in runtime.core_type_names() {
            name::resolve(&runtime, name)
                .unwrap_or_else(|e| {
                    panic!("couldn't resolve catalogue entry '{name}': {e}");
                });
        }

        for name in &["Object", "String", "Loader::Source", "argv.class"] {
            assert!(
                runtime.core_type_names().contains(name),
                "expected the catalogue to contain '{name}'",
            );
        }
    }

    #[cfg(not(feature = "bignum"))]
    #[test]
    fn test_unresolved_catalogue_names_are_dropped() {
        let runtime = Runtime::new();

        assert!(catalogue_type_names().contains(&"BigNum"));
        assert!(!runtime.core_type_names().contains(&"BigNum"));
    }

    #[test]
    fn test_freeze_core_freezes_the_catalogue() {
        let runtime = Runtime::new();

        runtime.freeze_core(&FreezeOpts::default())
            .expect("freezing the core should succeed");

        for name in runtime.core_type_names() {
            let ty = name::resolve(&runtime, name)
                .expect("a catalogue entry should resolve");

            assert!(
                ty.lock().unwrap().frozen(),
                "expected '{name}' to be frozen",
            );
        }
    }

    #[test]
    fn test_freeze_core_skips_excepted_names() {
        let runtime = Runtime::new();

        let opts = FreezeOpts{except: vec!["String".to_string()]};
        runtime.freeze_core(&opts)
            .expect("freezing the core should succeed");

        let string = name::resolve(&runtime, "String")
            .expect("'String' should resolve");
        assert!(!string.lock().unwrap().frozen());

        let array = name::resolve(&runtime, "Array")
            .expect("'Array' should resolve");
        assert!(array.lock().unwrap().frozen());
    }

    #[test]
    fn test_freeze_core_is_idempotent() {
        let runtime = Runtime::new();

        runtime.freeze_core(&FreezeOpts::default())
            .expect("freezing the core should succeed");
        runtime.freeze_core(&FreezeOpts::default())
            .expect("freezing the core again should succeed");
    }
}
