// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

use std::env;
use std::fs;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

#[macro_use]
extern crate indoc;
extern crate lalrpop;

fn main() {
    lalrpop::process_root().unwrap();

    let raw_tgt_dir = env::var("OUT_DIR").unwrap();
    let tgt_dir = Path::new(&raw_tgt_dir);

    gen_tests("tests/check", tgt_dir);
}

// `gen_tests` renders each test defined in the `.test` files under
// `src_dir` as a Rust test that runs the `icebox` binary on a script file
// and asserts on the binary's exit code, STDOUT and STDERR.
fn gen_tests(src_dir: &str, tgt_dir: &Path) {
    let tgt_file = tgt_dir.join("tests.rs");
    let mut test_file = File::create(&tgt_file)
        .expect("couldn't create test file");

    let test_dir = tgt_dir.join("tests");
    if let Err(e) = fs::create_dir(&test_dir) {
        if e.kind() != ErrorKind::AlreadyExists {
            panic!("couldn't create test directory: {}", e);
        }
    }

    write_test_file_header(&mut test_file);

    let entries = fs::read_dir(src_dir)
        .expect("couldn't read test directory");

    for maybe_entry in entries {
        let entry = maybe_entry
            .expect("couldn't read test directory entry");

        let entry_path = entry.path();
        if entry_path.extension() != Some("test".as_ref()) {
            continue;
        }

        let entry_stem_raw = entry_path.file_stem()
            .expect("couldn't extract file stem from path");

        let entry_stem = entry_stem_raw.to_str()
            .expect("file stem contains invalid UTF-8");

        writedoc!(
            test_file,
            "
                mod {mod_name} {{
                    #[allow(clippy::wildcard_imports)]
                    use super::*;
            ",
            mod_name = entry_stem,
        )
            .expect("couldn't write test file module start");

        for test in extract_tests(entry_path.clone()) {
            write_test(&mut test_file, &test_dir, entry_stem, &test);
        }

        write!(test_file, "\n}}\n")
            .expect("couldn't write test file module end");
    }
}

// `extract_tests` parses a `.test` file. Each test starts with a marker
// line carrying the test name, followed by four sections separated by
// section markers: the expected exit code, the script source, the expected
// STDOUT and the expected STDERR. The file ends with a bare marker line.
fn extract_tests(entry_path: PathBuf) -> Vec<Test> {
    let f = File::open(&entry_path)
        .expect("couldn't open test file");

    let mut tests = vec![];
    let mut cur_test: Option<Test> = None;
    let mut test_section = 0;
    let mut end_matched = false;
    for maybe_line in BufReader::new(f).lines() {
        let line = maybe_line
            .expect("couldn't read line from test file");

        if end_matched {
            panic!("extra lines discovered after closing test marker");
        }

        if let Some(suffix) = line.strip_prefix(TEST_MARKER_START) {
            if let Some(test) = cur_test.take() {
                if test_section != 3 {
                    panic!("test '{}' doesn't have 4 sections", test.name);
                }
                tests.push(test);
            }

            if suffix.is_empty() {
                end_matched = true;
                continue;
            }

            let test_name = suffix.strip_prefix(' ')
                .expect("expected space before test name");

            cur_test = Some(Test{
                name: String::from(test_name),
                tgt_code: 0,
                src: String::from(""),
                tgt_stdout: String::from(""),
                tgt_stderr: String::from(""),
            });
            test_section = 0;
        } else if line == TEST_MARKER_SECTION {
            test_section += 1;
        } else {
            let test = cur_test.as_mut()
                .expect("lines discovered before first test marker");

            if test_section == 0 {
                let value = line.strip_prefix("exit_code: ")
                    .expect("missing 'exit_code' key");

                test.tgt_code = value.parse()
                    .expect("couldn't parse exit code as `i32`");
            } else if test_section == 1 {
                test.src += &(line + "\n");
            } else if test_section == 2 {
                test.tgt_stdout += &(line + "\n");
            } else if test_section == 3 {
                test.tgt_stderr += &(line + "\n");
            } else {
                panic!("too many sections defined for test");
            }
        }
    }

    if !end_matched {
        panic!("test file didn't end with closing test marker");
    }

    tests
}

#[derive(Clone)]
struct Test {
    name: String,
    tgt_code: i32,
    src: String,
    tgt_stdout: String,
    tgt_stderr: String,
}

const TEST_MARKER_START: &str =
    "==================================================";

const TEST_MARKER_SECTION: &str =
    "--------------------------------------------------";

fn write_test_file_header(test_file: &mut File) {
    let header = indoc!{"
        use std::fs;
        use std::path::Path;

        use crate::assert_cmd::Command;

        struct Test {
            src: String,
            exp: TestExpectation,
        }

        struct TestExpectation {
            code: i32,
            stdout: String,
            stderr: String,
        }

        fn run_test(test_dir: &str, script_path: &str, test: Test) {
            let Test{src, exp} = test;

            let path = Path::new(test_dir).join(script_path);
            fs::write(&path, src)
                .unwrap_or_else(|_| {
                    panic!(\"couldn't create script at '{}'\", path.display());
                });

            let mut cmd = Command::cargo_bin(env!(\"CARGO_PKG_NAME\")).unwrap();
            let assert = cmd
                .current_dir(test_dir)
                .arg(script_path)
                .assert();

            assert
                .code(exp.code)
                .stdout(exp.stdout)
                .stderr(exp.stderr);
        }
    "};
    write!(test_file, "{}", header)
        .expect("couldn't write test file header");
}

fn write_test(
    test_file: &mut File,
    root_test_dir: &Path,
    file_test_dir_name: &str,
    test: &Test,
) {
    let file_test_dir = root_test_dir.join(file_test_dir_name);

    fs::create_dir_all(&file_test_dir)
        .expect("couldn't create directories for file tests");

    let script_path =
        Path::new(file_test_dir_name).join(test.name.clone() + ".ice");

    write!(
        test_file,
        indoc!{"

            #[test]
            fn {name}() {{
                run_test(
                    \"{test_dir}\",
                    \"{script_path}\",
                    Test{{
                        src: String::from(r#\"{src}\"#),
                        exp: TestExpectation{{
                            code: {tgt_code},
                            stdout: String::from(r#\"{tgt_stdout}\"#),
                            stderr: String::from(r#\"{tgt_stderr}\"#),
                        }},
                    }}
                );
            }}
        "},
        name = test.name,
        test_dir = root_test_dir.display(),
        script_path = script_path.display(),
        src = test.src,
        tgt_code = test.tgt_code,
        tgt_stdout = test.tgt_stdout,
        tgt_stderr = test.tgt_stderr,
    )
        .unwrap_or_else(|_| panic!(
            "couldn't write test '{}' to test file",
            test.name,
        ));
}
