//! Keyword tables. Rule tables are ordered: the first row that matches wins.

use crate::models::{AccessType, Condition};

/// Neighborhoods recognized in listing location lines
pub const DEFAULT_KNOWN_NEIGHBORHOODS: &[&str] =
    &["analakely", "isoraka", "andraharo", "ankadifotsy", "ankadikely"];

pub const BATHROOM: &[&str] = &["salle de bain", "sdb"];

pub const INTERIOR: &[&str] = &["intérieur", "int."];

pub const FURNISHED: &[&str] = &["meublé", "meuble", "fourni"];

pub const ACCESS_RULES: &[(&[&str], AccessType)] = &[
    (&["parking"], AccessType::CarWithParking),
    (&["voiture"], AccessType::Car),
    (&["moto"], AccessType::Motorbike),
];

pub const CONDITION_RULES: &[(&[&str], Condition)] = &[
    (
        &["neuf", "nouveau", "neuve", "bon état", "bon etat", "bien entretenu"],
        Condition::Good,
    ),
    (&["moyen", "moyenne"], Condition::Average),
    (&["mauvais", "à rénover", "a renover"], Condition::Poor),
];
