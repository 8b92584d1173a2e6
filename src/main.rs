// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

use std::path::Path;
use std::process;

use snafu::OptionExt;
use snafu::ResultExt;
use snafu::Snafu;

use icebox::CheckOpts;
use icebox::Error as CheckError;
use icebox::Runtime;

fn main() {
    if let Err(e) = f() {
        match e {
            Error::ScriptArgMissing => {
                eprintln!("missing script argument");
            },
            Error::CheckScriptFailed{source} => {
                eprintln!("{}", source);
            },
        }
        process::exit(1);
    }
}

fn f() -> Result<(), Error> {
    let mut args = std::env::args();
    let _prog = args.next()
        .expect("couldn't get program name");
    let raw_script_path = args.next()
        .context(ScriptArgMissing)?;
    let script_path = Path::new(&raw_script_path);

    let runtime = Runtime::new();
    runtime.check_require(script_path, &CheckOpts::default())
        .context(CheckScriptFailed)?;

    Ok(())
}

#[derive(Debug, Snafu)]
enum Error {
    ScriptArgMissing,
    CheckScriptFailed{source: CheckError},
}
