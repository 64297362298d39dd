//! Identifier values for the single id column.

use std::fmt;
use std::str::FromStr;

/// A row identifier. `IdValue::NONE` marks an absent or unparsable id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdValue(pub i64);

impl IdValue {
    pub const NONE: IdValue = IdValue(-1);

    /// Lenient parse: anything that is not a strict decimal i64 becomes `NONE`.
    pub fn parse_or_none(s: &str) -> IdValue {
        s.parse().unwrap_or(IdValue::NONE)
    }

    pub fn is_none(&self) -> bool {
        *self == IdValue::NONE
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl FromStr for IdValue {
    type Err = std::num::ParseIntError;

    /// Strict decimal: optional sign, digits only, no padding. Leading zeros are
    /// insignificant, overflow is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(IdValue)
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for IdValue {
    fn from(n: i64) -> Self {
        IdValue(n)
    }
}

/// Split a comma-separated id list, preserving order and duplicates.
/// Unparsable items become `IdValue::NONE`; callers validate first.
pub fn parse_id_list(csv: &str) -> Vec<IdValue> {
    if csv.is_empty() {
        return Vec::new();
    }
    csv.split(',').map(IdValue::parse_or_none).collect()
}

pub fn id_list_to_string(ids: &[IdValue]) -> String {
    ids.iter().map(IdValue::to_string).collect::<Vec<_>>().join(",")
}
