// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

use std::io::Error as IoError;
use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub")]
pub enum Error {
    #[snafu(display("'{}' is not a valid type name", name))]
    InvalidName{name: String},
    #[snafu(display("'{}' is not defined", name))]
    UnresolvedName{name: String},

    #[snafu(display("can't modify frozen {}: {}", kind, name))]
    FrozenType{kind: String, name: String},

    #[snafu(display("'{}' is not a {}", name, expected))]
    MismatchedType{name: String, expected: String},
    #[snafu(display("superclass mismatch for class '{}'", name))]
    SuperclassMismatch{name: String},
    #[snafu(display("superclass of '{}' must be a class", name))]
    SuperclassNotClass{name: String},
    #[snafu(display("method '{}' isn't defined on '{}'", method, name))]
    UndefinedMethod{name: String, method: String},

    #[snafu(display("couldn't read script at '{}': {}", path.display(), source))]
    ReadScriptFailed{path: PathBuf, source: IoError},
    #[snafu(display("{}", msg))]
    ParseScriptFailed{msg: String},
    #[snafu(display("couldn't load '{}': {}", path.display(), source))]
    LoadScriptFailed{
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
        path: PathBuf,
    },

    // Location information is attached by wrapping, which keeps the other
    // variants free of location fields.
    #[snafu(display("{}:{}: {}", line, col, source))]
    AtLoc{
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
        line: usize,
        col: usize,
    },
}
