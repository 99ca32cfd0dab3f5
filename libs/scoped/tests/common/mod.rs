#![allow(dead_code)]

use std::collections::HashMap;

use scoped::Scoped;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Scoped)]
pub struct Example {
    pub id: i64,
    #[scoped(scopes("admin"))]
    #[serde(default)]
    pub admin_only: String,
    #[scoped(omit_empty, scopes("user"))]
    #[serde(default)]
    pub user_only: String,
    #[scoped(omit_empty, scopes("user", "admin"))]
    #[serde(default)]
    pub both: String,
    #[scoped(omit_empty, scopes("user", "admin"))]
    #[serde(default)]
    pub omitter: String,
    #[serde(skip)]
    pub hidden: String,
    #[scoped(omit_empty)]
    #[serde(default)]
    pub all: String,
}

pub fn example(id: i64) -> Example {
    Example {
        id,
        admin_only: "A".to_owned(),
        user_only: "U".to_owned(),
        both: "B".to_owned(),
        omitter: String::new(),
        hidden: "H".to_owned(),
        all: "X".to_owned(),
    }
}

/// Serializable in Rust, but its map keys have no JSON representation.
#[derive(Debug, Default, Serialize, Scoped)]
pub struct GridCell {
    pub id: i64,
    #[scoped(scopes("user"))]
    pub neighbours: HashMap<(u8, u8), u8>,
}

pub fn grid_cell(id: i64) -> GridCell {
    GridCell {
        id,
        neighbours: HashMap::from([((1, 2), 3)]),
    }
}
