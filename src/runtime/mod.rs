// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

use std::fs;
use std::path::Path;

pub mod builtins;
pub mod error;
pub mod ty;

use lalrpop_util::ParseError;
use snafu::OptionExt;
use snafu::ResultExt;

// We use a wildcard import for `error` to import the many error variant
// constructors created by Snafu.
#[allow(clippy::wildcard_imports)]
use self::error::*;
use self::error::Error;
use self::ty::Method;
use self::ty::TypeKind;
use self::ty::TypeRef;
use crate::ast::Location;
use crate::ast::Prog;
use crate::ast::RawStmt;
use crate::ast::Stmt;
use crate::freeze;
use crate::lexer;
use crate::lexer::LexError;
use crate::lexer::Lexer;
use crate::lexer::Token;
use crate::name;
use crate::parser::ProgParser;

// `LOADED_SCRIPTS_TYPE` is the module that records each loaded script; see
// `Runtime::require`.
const LOADED_SCRIPTS_TYPE: &str = "Loader::Source";

pub struct Runtime {
    root: TypeRef,
    argv_class: TypeRef,

    // `core_names` is the version catalogue filtered to the names that
    // resolve in this build. It's computed once, at construction, and never
    // modified afterwards.
    core_names: Vec<&'static str>,
}

impl Runtime {
    pub fn new() -> Runtime {
        let root = ty::new_class("Object", None);
        builtins::register(&root);

        let io = ty::lookup_path(&root, &["IO"])
            .expect("'IO' should be registered as a built-in type");
        let argv_class = ty::new_class(name::ARGV_CLASS, Some(io));

        let mut runtime = Runtime{root, argv_class, core_names: vec![]};

        // Different builds provide different optional types, so catalogue
        // entries that don't resolve are dropped.
        runtime.core_names =
            freeze::catalogue_type_names()
                .into_iter()
                .filter(|n| name::resolve(&runtime, n).is_ok())
                .collect();

        runtime
    }

    // `root` returns the root class, which owns all top-level constants.
    pub fn root(&self) -> TypeRef {
        self.root.clone()
    }

    // `argv_class` returns the type of the script-arguments stream; see
    // `name::ARGV_CLASS`.
    pub fn argv_class(&self) -> TypeRef {
        self.argv_class.clone()
    }

    // `core_type_names` returns the names of the built-in types that this
    // build provides, in catalogue order.
    pub fn core_type_names(&self) -> &[&'static str] {
        &self.core_names
    }

    pub fn lookup(&self, segments: &[&str]) -> Option<TypeRef> {
        ty::lookup_path(&self.root, segments)
    }

    // `require` loads the script at `path` unless it was already loaded.
    // Each loaded script is recorded on the `Loader::Source` module before
    // its statements are evaluated, so that scripts that require each other
    // terminate. The record is what makes freezing `Loader::Source` break
    // `require` itself.
    pub fn require(&self, path: &Path) -> Result<(), Error> {
        let canonical_path = fs::canonicalize(path)
            .context(ReadScriptFailed{path: path.to_path_buf()})?;

        let record = canonical_path.to_string_lossy().to_string();

        let sources = self.loaded_scripts()?;
        if sources.lock().unwrap().methods.contains_key(&record) {
            return Ok(());
        }

        let src = fs::read_to_string(&canonical_path)
            .context(ReadScriptFailed{path: path.to_path_buf()})?;

        sources.lock().unwrap()
            .define_method(&record, Method{defined_at: None})
            .context(LoadScriptFailed{path: path.to_path_buf()})?;

        let script_dir = canonical_path.parent()
            .expect("a canonical script path should have a parent directory");

        self.eval_src(script_dir, &src)
            .context(LoadScriptFailed{path: path.to_path_buf()})?;

        Ok(())
    }

    fn loaded_scripts(&self) -> Result<TypeRef, Error> {
        let segments: Vec<&str> = LOADED_SCRIPTS_TYPE.split("::").collect();

        self.lookup(&segments)
            .context(UnresolvedName{name: LOADED_SCRIPTS_TYPE.to_string()})
    }

    // `eval_src` parses and evaluates `src`. `require`d paths are resolved
    // relative to `script_dir`.
    pub(crate) fn eval_src(&self, script_dir: &Path, src: &str)
        -> Result<(), Error>
    {
        let lexer = Lexer::new(src);
        let Prog::Body{stmts} =
            ProgParser::new()
                .parse(lexer)
                .map_err(|e| Error::ParseScriptFailed{
                    msg: render_parse_error(&e),
                })?;

        for stmt in &stmts {
            self.eval_stmt(script_dir, stmt)?;
        }

        Ok(())
    }

    fn eval_stmt(&self, script_dir: &Path, stmt: &Stmt)
        -> Result<(), Error>
    {
        let (raw_stmt, (line, col)) = stmt;

        let r =
            match raw_stmt {
                RawStmt::Require{path} => {
                    self.require(&script_dir.join(path))
                },
                RawStmt::Module{name} => {
                    self.define_module(name)
                        .map(|_| ())
                },
                RawStmt::Class{name, parent} => {
                    self.define_class(name, parent.as_deref())
                        .map(|_| ())
                },
                RawStmt::Def{target, method} => {
                    self.define_method(target, method, (*line, *col))
                },
                RawStmt::Undef{target, method} => {
                    self.remove_method(target, method)
                },
                RawStmt::Freeze{name} => {
                    self.freeze_type(name)
                },
            };

        r.map_err(|source| Error::AtLoc{
            source: Box::new(source),
            line: *line,
            col: *col,
        })
    }

    // `define_module` binds a new empty module at `name`, or returns the
    // existing module if `name` is already bound to one.
    pub fn define_module(&self, name: &str) -> Result<TypeRef, Error> {
        let segments = name::parse(name)?;
        let (owner, last) = self.owner_of(&segments)?;
        let full_name = self.full_name(&owner, last);

        let existing = owner.lock().unwrap().consts.get(last).cloned();
        if let Some(existing) = existing {
            let is_module =
                matches!(existing.lock().unwrap().kind, TypeKind::Module);
            if is_module {
                return Ok(existing);
            }

            return MismatchedType{
                name: full_name,
                expected: "module".to_string(),
            }.fail();
        }

        let module = ty::new_module(&full_name);
        owner.lock().unwrap().define_const(last, module.clone())?;

        Ok(module)
    }

    // `define_class` binds a new class at `name`, subclassing `parent` (the
    // root class if `parent` is `None`). If `name` is already bound to a
    // class then the existing class is returned, unless `parent` is given
    // and names a different superclass.
    pub fn define_class(&self, name: &str, parent: Option<&str>)
        -> Result<TypeRef, Error>
    {
        let segments = name::parse(name)?;
        let (owner, last) = self.owner_of(&segments)?;
        let full_name = self.full_name(&owner, last);

        let parent_ty =
            match parent {
                Some(parent_name) => name::resolve(self, parent_name)?,
                None => self.root.clone(),
            };

        if let TypeKind::Module = parent_ty.lock().unwrap().kind {
            return SuperclassNotClass{name: full_name}.fail();
        }

        let existing = owner.lock().unwrap().consts.get(last).cloned();
        if let Some(existing) = existing {
            {
                let unlocked_existing = existing.lock().unwrap();
                match &unlocked_existing.kind {
                    TypeKind::Class{parent: existing_parent} => {
                        if parent.is_some() {
                            let parent_matches =
                                match existing_parent {
                                    Some(p) => ty::ref_eq(p, &parent_ty),
                                    None => false,
                                };

                            if !parent_matches {
                                return SuperclassMismatch{name: full_name}
                                    .fail();
                            }
                        }
                    },
                    TypeKind::Module => {
                        return MismatchedType{
                            name: full_name,
                            expected: "class".to_string(),
                        }.fail();
                    },
                }
            }

            return Ok(existing);
        }

        let class = ty::new_class(&full_name, Some(parent_ty));
        owner.lock().unwrap().define_const(last, class.clone())?;

        Ok(class)
    }

    fn define_method(&self, target: &str, method: &str, loc: Location)
        -> Result<(), Error>
    {
        let ty = name::resolve(self, target)?;
        let mut unlocked_ty = ty.lock().unwrap();

        unlocked_ty.define_method(method, Method{defined_at: Some(loc)})
    }

    fn remove_method(&self, target: &str, method: &str)
        -> Result<(), Error>
    {
        let ty = name::resolve(self, target)?;
        let mut unlocked_ty = ty.lock().unwrap();

        unlocked_ty.remove_method(method)
    }

    fn freeze_type(&self, name: &str) -> Result<(), Error> {
        let ty = name::resolve(self, name)?;
        ty.lock().unwrap().freeze();

        Ok(())
    }

    // `owner_of` returns the type that owns the final segment of
    // `segments`, along with that final segment.
    fn owner_of<'a>(&self, segments: &[&'a str])
        -> Result<(TypeRef, &'a str), Error>
    {
        let (last, owner_path) = segments.split_last()
            .expect("a parsed name should have at least one segment");

        let owner =
            if owner_path.is_empty() {
                self.root.clone()
            } else {
                self.lookup(owner_path)
                    .context(UnresolvedName{name: owner_path.join("::")})?
            };

        Ok((owner, *last))
    }

    fn full_name(&self, owner: &TypeRef, last: &str) -> String {
        if ty::ref_eq(owner, &self.root) {
            last.to_string()
        } else {
            format!("{}::{}", owner.lock().unwrap().name, last)
        }
    }
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime::new()
    }
}

fn render_parse_error(e: &ParseError<lexer::Location, Token, LexError>)
    -> String
{
    match e {
        ParseError::InvalidToken{location: (line, col)} => {
            format!("{line}:{col}: invalid token")
        },
        ParseError::UnrecognizedEof{location: (line, col), ..} => {
            format!("{line}:{col}: unexpected end of script")
        },
        ParseError::UnrecognizedToken{token: ((line, col), t, _), ..} => {
            format!("{}:{}: unexpected {}", line, col, render_token(t))
        },
        ParseError::ExtraToken{token: ((line, col), t, _)} => {
            format!("{}:{}: unexpected {}", line, col, render_token(t))
        },
        ParseError::User{error} => render_lex_error(error),
    }
}

fn render_token(t: &Token) -> String {
    let s =
        match t {
            Token::Ident(name) => return format!("'{name}'"),
            Token::StrLiteral(s) => return format!("string \"{s}\""),

            Token::Class => "'class'",
            Token::Def => "'def'",
            Token::Freeze => "'freeze'",
            Token::Module => "'module'",
            Token::Require => "'require'",
            Token::Undef => "'undef'",

            Token::ColonColon => "'::'",
            Token::Dot => "'.'",
            Token::LessThan => "'<'",
        };

    s.to_string()
}

fn render_lex_error(e: &LexError) -> String {
    match e {
        LexError::Unexpected((line, col), c) => {
            format!("{line}:{col}: unexpected character '{c}'")
        },
        LexError::UnpairedColon((line, col)) => {
            format!("{line}:{col}: expected '::'")
        },
        LexError::UnterminatedStr((line, col)) => {
            format!("{line}:{col}: unterminated string literal")
        },
        LexError::InvalidEscapeChar((line, col), c) => {
            format!("{line}:{col}: invalid escape character '{c}'")
        },
    }
}
