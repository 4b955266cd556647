//! Documents returned by the external APIs.

use serde::{Deserialize, Serialize};

/// One work cycle (sprint) of the project-management tool.
///
/// Only the id is used: it parameterizes the task-list URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskIteration {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Response of the date-info endpoint used by the holiday gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DateInfo {
    #[serde(rename = "isHoliday", default)]
    pub is_holiday: bool,
}
