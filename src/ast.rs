// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

#[derive(Clone, Debug)]
pub enum Prog {
    Body{stmts: Block},
}

pub type Block = Vec<Stmt>;

pub type Stmt = (RawStmt, Location);

pub type Location = (usize, usize);

#[derive(Clone, Debug)]
pub enum RawStmt {
    Require{path: String},

    Module{name: String},
    Class{name: String, parent: Option<String>},

    Def{target: String, method: String},
    Undef{target: String, method: String},

    Freeze{name: String},
}
