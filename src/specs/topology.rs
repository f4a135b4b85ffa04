//! Robot topology detection
//!
//! A spec directory describes either one automation unit (documents at the
//! root) or several units kept in `robot<N>/` subdirectories. The presence of
//! `robot1/` directly under the spec root is what switches to multi-robot.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SpeckitError};

const UNIT_PREFIX: &str = "robot";

/// Identifier of one unit in a multi-robot spec (`robot<N>`, N >= 1)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(u32);

impl UnitId {
    pub fn new(index: u32) -> Option<Self> {
        (index > 0).then_some(Self(index))
    }

    /// Parse a directory name such as `robot12`
    pub fn parse(name: &str) -> Option<Self> {
        let digits = name.strip_prefix(UNIT_PREFIX)?;
        // Leading zeros would make the parsed id disagree with the directory name
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        digits.parse().ok().and_then(Self::new)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    /// Directory name of the unit under the spec root
    pub fn dir_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{UNIT_PREFIX}{}", self.0)
    }
}

impl Serialize for UnitId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Shape of a spec directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RobotTopology {
    Standalone,
    MultiRobot { units: Vec<UnitId> },
}

impl RobotTopology {
    pub fn units(&self) -> &[UnitId] {
        match self {
            RobotTopology::Standalone => &[],
            RobotTopology::MultiRobot { units } => units,
        }
    }

    pub fn is_multi_robot(&self) -> bool {
        matches!(self, RobotTopology::MultiRobot { .. })
    }
}

/// Detect whether `spec_dir` is standalone or multi-robot
///
/// Units are returned in ascending numeric order, so `robot10` sorts after
/// `robot2` regardless of directory listing order.
pub fn detect_topology(spec_dir: &Path) -> Result<RobotTopology> {
    let first = UnitId(1);
    if !spec_dir.join(first.dir_name()).is_dir() {
        return Ok(RobotTopology::Standalone);
    }

    let entries =
        std::fs::read_dir(spec_dir).map_err(|e| SpeckitError::read_failed(spec_dir, &e))?;

    let mut units = Vec::new();
    for entry_result in entries {
        let Ok(entry) = entry_result else {
            continue;
        };
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(unit) = UnitId::parse(name) {
            units.push(unit);
        }
    }

    units.sort();
    units.dedup();
    tracing::debug!(count = units.len(), "multi-robot spec detected");
    Ok(RobotTopology::MultiRobot { units })
}
