//! Assembly stage indices and the stage-to-label table.
//!
//! The toy-car assembly procedure is annotated as 23 progressive stages
//! plus one reserved error state. Each stage maps to a 12-bit multi-label
//! vector describing which sub-assemblies are complete at that stage. The
//! table is hand-authored domain knowledge: the rows follow the physical
//! build order of the car, not a generative rule.

use std::fmt;

use anyhow::{anyhow, Result};

/// Number of rows in the stage table (stages 0..=22 plus the error state).
pub const STAGE_COUNT: usize = 24;

/// Width of a completion label vector.
pub const LABEL_BITS: usize = 12;

/// Stage-to-label table.
///
/// Rows 0..=22 are progressive assembly stages. Row 23 is the reserved
/// error/sentinel state: no sub-assembly bit set, only the final error bit.
pub const STAGE_LABELS: [[u8; LABEL_BITS]; STAGE_COUNT] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 0
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 1
    [1, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0], // 2
    [1, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0], // 3
    [1, 0, 0, 1, 0, 1, 1, 0, 0, 0, 0, 0], // 4
    [1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 5
    [1, 1, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0], // 6
    [1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 0, 0], // 7
    [1, 1, 1, 1, 0, 1, 1, 0, 0, 0, 0, 0], // 8
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 0, 0, 0], // 9
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 0], // 10
    [1, 1, 1, 1, 0, 1, 1, 0, 0, 0, 1, 0], // 11
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 0, 1, 0], // 12
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 0], // 13
    [1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 0], // 14
    [1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 0], // 15
    [1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 0, 0], // 16
    [1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 0, 0], // 17
    [1, 1, 1, 0, 0, 0, 0, 1, 1, 1, 0, 0], // 18
    [1, 1, 1, 0, 1, 1, 0, 1, 1, 1, 0, 0], // 19
    [1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 0, 0], // 20
    [1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 0, 0], // 21
    [1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0], // 22
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1], // 23 error state
];

/// Bounds-checked index into the stage table.
///
/// Construction is the only validation point: once a `StageIndex` exists,
/// the table lookup cannot fail. Out-of-range values are rejected, never
/// clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct StageIndex(u8);

impl StageIndex {
    /// The reserved error/sentinel stage.
    pub const ERROR: StageIndex = StageIndex(23);

    pub fn new(value: u8) -> Result<Self> {
        if (value as usize) < STAGE_COUNT {
            Ok(Self(value))
        } else {
            Err(anyhow!(
                "stage index {} out of range; stages are 0..={}",
                value,
                STAGE_COUNT - 1
            ))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Completion label vector for this stage.
    pub fn label(self) -> [u8; LABEL_BITS] {
        STAGE_LABELS[self.0 as usize]
    }

    pub fn is_error(self) -> bool {
        self == Self::ERROR
    }
}

impl fmt::Display for StageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
