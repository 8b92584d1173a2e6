// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

extern crate assert_cmd;

include!(concat!(env!("OUT_DIR"), "/tests.rs"));
