//! Fixed wiring of the wormhole centre, written for the 8x8 board.
//!
//! The loop duplicates and the four pentagons per sheet do not follow grid
//! adjacency, so their neighbors, pentagon continuation rules and knight jumps
//! are listed by hand. The 6x6 board uses the same tables shifted by one
//! column and one row.

/// `(tile, [(direction, neighbor)])` overrides applied after grid wiring.
pub type ConnectionTable = &'static [(&'static str, &'static [(&'static str, &'static str)])];

/// `(pentagon, [(arriving_from, [continue_along])])`.
pub type RelationTable = &'static [(&'static str, &'static [(&'static str, &'static [&'static str])])];

pub const TOP_CONNECTIONS: ConnectionTable = &[
    ("d3_T", &[("UL", "d4_1_T")]),
    ("e3_T", &[("UR", "e4_1_T")]),
    ("c4_T", &[("DR", "d4_1_T"), ("R", "d4_2_T"), ("UR", "d5_2_T")]),
    ("f4_T", &[("DL", "e4_1_T"), ("L", "e4_2_T"), ("UL", "e5_2_T")]),
    ("c5_T", &[("DR", "d4_2_T"), ("R", "d5_2_T"), ("UR", "d5_1_T")]),
    ("f5_T", &[("DL", "e4_2_T"), ("L", "e5_2_T"), ("UL", "e5_1_T")]),
    ("d6_T", &[("DL", "d5_1_T")]),
    ("e6_T", &[("DR", "e5_1_T")]),
    ("d4_T", &[("L", "d4_1_T"), ("UL", "d4_1_B"), ("UP", "d4_B"), ("UR", "e4_B")]),
    (
        "d4_1_T",
        &[
            ("L", "d4_2_T"),
            ("UL", "d4_2_B"),
            ("UP", "d4_1_B"),
            ("UR", "d4_B"),
            ("R", "d4_T"),
            ("DR", "d3_T"),
            ("DOWN", "c3_T"),
            ("DL", "c4_T"),
        ],
    ),
    (
        "d4_2_T",
        &[
            ("L", "c4_T"),
            ("UL", "c5_T"),
            ("UP", "d5_2_T"),
            ("UR", "d5_2_B"),
            ("R", "d4_2_B"),
            ("DR", "d4_1_B"),
            ("DOWN", "d4_1_T"),
            ("DL", "c3_T"),
        ],
    ),
    (
        "d5_2_T",
        &[
            ("L", "c5_T"),
            ("UL", "c6_T"),
            ("UP", "d5_1_T"),
            ("UR", "d5_1_B"),
            ("R", "d5_2_B"),
            ("DR", "d4_2_B"),
            ("DOWN", "d4_2_T"),
            ("DL", "c4_T"),
        ],
    ),
    (
        "d5_1_T",
        &[
            ("L", "d5_2_T"),
            ("UL", "c5_T"),
            ("UP", "c6_T"),
            ("UR", "d6_T"),
            ("R", "d5_T"),
            ("DR", "d5_B"),
            ("DOWN", "d5_1_B"),
            ("DL", "d5_2_B"),
        ],
    ),
    ("d5_T", &[("L", "d5_1_T"), ("DL", "d5_1_B"), ("DOWN", "d5_B"), ("DR", "e5_B")]),
    ("e4_T", &[("R", "e4_1_T"), ("UL", "d4_B"), ("UP", "e4_B"), ("UR", "e4_1_B")]),
    (
        "e4_1_T",
        &[
            ("L", "e4_T"),
            ("UL", "e4_B"),
            ("UP", "e4_1_B"),
            ("UR", "e4_2_B"),
            ("R", "e4_2_T"),
            ("DR", "f4_T"),
            ("DOWN", "f3_T"),
            ("DL", "e3_T"),
        ],
    ),
    (
        "e4_2_T",
        &[
            ("L", "e4_2_B"),
            ("UL", "e5_2_B"),
            ("UP", "e5_2_T"),
            ("UR", "f5_T"),
            ("R", "f4_T"),
            ("DR", "f3_T"),
            ("DOWN", "e4_1_T"),
            ("DL", "e4_1_B"),
        ],
    ),
    (
        "e5_2_T",
        &[
            ("L", "e5_2_B"),
            ("UL", "e5_1_B"),
            ("UP", "e5_1_T"),
            ("UR", "f6_T"),
            ("R", "f5_T"),
            ("DR", "f4_T"),
            ("DOWN", "e4_2_T"),
            ("DL", "e4_2_B"),
        ],
    ),
    (
        "e5_1_T",
        &[
            ("L", "e5_T"),
            ("UL", "e6_T"),
            ("UP", "f6_T"),
            ("UR", "f5_T"),
            ("R", "e5_2_T"),
            ("DR", "e5_2_B"),
            ("DOWN", "e5_1_B"),
            ("DL", "e5_B"),
        ],
    ),
    ("e5_T", &[("R", "e5_1_T"), ("DL", "d5_B"), ("DOWN", "e5_B"), ("DR", "e5_1_B")]),
];

pub const BOTTOM_CONNECTIONS: ConnectionTable = &[
    ("d3_B", &[("UR", "d4_1_B")]),
    ("e3_B", &[("UL", "e4_1_B")]),
    ("c4_B", &[("DL", "d4_1_B"), ("L", "d4_2_B"), ("UL", "d5_2_B")]),
    ("f4_B", &[("DR", "e4_1_B"), ("R", "e4_2_B"), ("UR", "e5_2_B")]),
    ("c5_B", &[("DL", "d4_2_B"), ("L", "d5_2_B"), ("UL", "d5_1_B")]),
    ("f5_B", &[("DR", "e4_2_B"), ("R", "e5_2_B"), ("UR", "e5_1_B")]),
    ("d6_B", &[("DR", "d5_1_B")]),
    ("e6_B", &[("DL", "e5_1_B")]),
    ("d4_B", &[("R", "d4_1_B"), ("UR", "d4_1_T"), ("UP", "d4_T"), ("UL", "e4_T")]),
    (
        "d4_1_B",
        &[
            ("R", "d4_2_B"),
            ("UR", "d4_2_T"),
            ("UP", "d4_1_T"),
            ("UL", "d4_T"),
            ("L", "d4_B"),
            ("DL", "d3_B"),
            ("DOWN", "c3_B"),
            ("DR", "c4_B"),
        ],
    ),
    (
        "d4_2_B",
        &[
            ("R", "c4_B"),
            ("UR", "c5_B"),
            ("UP", "d5_2_B"),
            ("UL", "d5_2_T"),
            ("L", "d4_2_T"),
            ("DL", "d4_1_T"),
            ("DOWN", "d4_1_B"),
            ("DR", "c3_B"),
        ],
    ),
    (
        "d5_2_B",
        &[
            ("R", "c5_B"),
            ("UR", "c6_B"),
            ("UP", "d5_1_B"),
            ("UL", "d5_1_T"),
            ("L", "d5_2_T"),
            ("DL", "d4_2_T"),
            ("DOWN", "d4_2_B"),
            ("DR", "c4_B"),
        ],
    ),
    (
        "d5_1_B",
        &[
            ("R", "d5_2_B"),
            ("UR", "c5_B"),
            ("UP", "c6_B"),
            ("UL", "d6_B"),
            ("L", "d5_B"),
            ("DL", "d5_T"),
            ("DOWN", "d5_1_T"),
            ("DR", "d5_2_T"),
        ],
    ),
    ("d5_B", &[("R", "d5_1_B"), ("DR", "d5_1_T"), ("DOWN", "d5_T"), ("DL", "e5_T")]),
    ("e4_B", &[("L", "e4_1_B"), ("UR", "d4_T"), ("UP", "e4_T"), ("UL", "e4_1_T")]),
    (
        "e4_1_B",
        &[
            ("R", "e4_B"),
            ("UR", "e4_T"),
            ("UP", "e4_1_T"),
            ("UL", "e4_2_T"),
            ("L", "e4_2_B"),
            ("DL", "f4_B"),
            ("DOWN", "f3_B"),
            ("DR", "e3_B"),
        ],
    ),
    (
        "e4_2_B",
        &[
            ("R", "e4_2_T"),
            ("UR", "e5_2_T"),
            ("UP", "e5_2_B"),
            ("UL", "f5_B"),
            ("L", "f4_B"),
            ("DL", "f3_B"),
            ("DOWN", "e4_1_B"),
            ("DR", "e4_1_T"),
        ],
    ),
    (
        "e5_2_B",
        &[
            ("R", "e5_2_T"),
            ("UR", "e5_1_T"),
            ("UP", "e5_1_B"),
            ("UL", "f6_B"),
            ("L", "f5_B"),
            ("DL", "f4_B"),
            ("DOWN", "e4_2_B"),
            ("DR", "e4_2_T"),
        ],
    ),
    (
        "e5_1_B",
        &[
            ("R", "e5_B"),
            ("UR", "e6_B"),
            ("UP", "f6_B"),
            ("UL", "f5_B"),
            ("L", "e5_2_B"),
            ("DL", "e5_2_T"),
            ("DOWN", "e5_1_T"),
            ("DR", "e5_T"),
        ],
    ),
    ("e5_B", &[("L", "e5_1_B"), ("DR", "d5_T"), ("DOWN", "e5_T"), ("DL", "e5_1_T")]),
];

pub const PENTAGON_RELATIONS: RelationTable = &[
    (
        "c3_T",
        &[
            ("DOWN", &["UP", "S"]),
            ("L", &["R", "S"]),
            ("S", &["DOWN", "L"]),
            ("DL", &["DG", "UR"]),
            ("DG", &["DL"]),
        ],
    ),
    (
        "c3_B",
        &[
            ("DOWN", &["UP", "S"]),
            ("R", &["L", "S"]),
            ("S", &["DOWN", "R"]),
            ("DR", &["DG", "UL"]),
            ("DG", &["DR"]),
        ],
    ),
    (
        "c6_T",
        &[
            ("UP", &["DOWN", "S"]),
            ("L", &["R", "S"]),
            ("S", &["UP", "L"]),
            ("UL", &["DG", "DR"]),
            ("DG", &["UL"]),
        ],
    ),
    (
        "c6_B",
        &[
            ("UP", &["DOWN", "S"]),
            ("R", &["L", "S"]),
            ("S", &["UP", "R"]),
            ("UR", &["DG", "DL"]),
            ("DG", &["UR"]),
        ],
    ),
    (
        "f3_T",
        &[
            ("DOWN", &["UP", "S"]),
            ("R", &["L", "S"]),
            ("S", &["DOWN", "R"]),
            ("DR", &["DG", "UL"]),
            ("DG", &["DR"]),
        ],
    ),
    (
        "f3_B",
        &[
            ("DOWN", &["UP", "S"]),
            ("L", &["R", "S"]),
            ("S", &["DOWN", "L"]),
            ("DL", &["DG", "UR"]),
            ("DG", &["DL"]),
        ],
    ),
    (
        "f6_T",
        &[
            ("UP", &["DOWN", "S"]),
            ("R", &["L", "S"]),
            ("S", &["UP", "R"]),
            ("UR", &["DG", "DL"]),
            ("DG", &["UR"]),
        ],
    ),
    (
        "f6_B",
        &[
            ("UP", &["DOWN", "S"]),
            ("L", &["R", "S"]),
            ("S", &["UP", "L"]),
            ("UL", &["DG", "DR"]),
            ("DG", &["UL"]),
        ],
    ),
];

/// Knight targets from loop-region tiles on the top sheet. The bottom sheet
/// uses the same lists with every side suffix swapped.
pub const KNIGHT_LOOP_JUMPS: &[(&str, &[&str])] = &[
    ("d4_T", &["e2_T", "c2_T", "b3_T", "f3_T", "c4_T", "e3_B", "c3_B", "d4_2_B", "e4_1_B"]),
    ("d4_1_T", &["b2_T", "d2_T", "e3_T", "b4_T", "c5_T", "e4_B", "d3_B", "d5_2_B", "c4_B"]),
    ("d4_2_T", &["c2_T", "b3_T", "d3_T", "b5_T", "c6_T", "c3_B", "c5_B", "d4_B", "d5_1_B"]),
    ("d5_2_T", &["b4_T", "b6_T", "c3_T", "c7_T", "d6_T", "d4_1_B", "d5_B", "c4_B", "c6_B"]),
    ("d5_1_T", &["b5_T", "b7_T", "c4_T", "d7_T", "e6_T", "e5_B", "d6_B", "d4_2_B", "c5_B"]),
    ("d5_T", &["b6_T", "c7_T", "e7_T", "f6_T", "c5_T", "e5_1_B", "e6_B", "c6_B", "d5_2_B"]),
    ("e4_T", &["c3_T", "d2_T", "f2_T", "g3_T", "f4_T", "f3_B", "e4_2_B", "d3_B", "d4_1_B"]),
    ("e4_1_T", &["d3_T", "e2_T", "g2_T", "g4_T", "f5_T", "f4_B", "e5_2_B", "e3_B", "d4_B"]),
    ("e4_2_T", &["e3_T", "f2_T", "g3_T", "g5_T", "f6_T", "f3_B", "f5_B", "e4_B", "e5_1_B"]),
    ("e5_2_T", &["f3_T", "f7_T", "g4_T", "g6_T", "e6_T", "e4_1_B", "e5_B", "f4_B", "f6_B"]),
    ("e5_1_T", &["d6_T", "e7_T", "g7_T", "g5_T", "f4_T", "e4_2_B", "f5_B", "e6_B", "d5_B"]),
    ("e5_T", &["c6_T", "d7_T", "f7_T", "g6_T", "f5_T", "e5_2_B", "f6_B", "d6_B", "d5_1_B"]),
];

/// Swap the trailing side letter of a canonical wormhole name.
pub fn mirror_side(name: &str) -> String {
    match name.strip_suffix("_T") {
        Some(stem) => format!("{stem}_B"),
        None => match name.strip_suffix("_B") {
            Some(stem) => format!("{stem}_T"),
            None => name.to_owned(),
        },
    }
}
