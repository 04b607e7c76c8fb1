use std::collections::HashSet;

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==============================================================================
// BLOCKED RANGES ("BLOQUEOS")
// ==============================================================================

/// Administrator-defined closed-open interval `[inicio, fin)` during which no
/// slot may be offered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedRange {
    pub id: i64,
    pub fecha_hora_inicio: DateTime<Utc>,
    pub fecha_hora_fin: DateTime<Utc>,
    pub motivo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlockedRangeRequest {
    pub fecha_hora_inicio: DateTime<Utc>,
    pub fecha_hora_fin: DateTime<Utc>,
    pub motivo: Option<String>,
}

// ==============================================================================
// SCHEDULING POLICY
// ==============================================================================

/// Fixed scheduling rules: a rolling search window, a uniform daily working
/// window and slot duration, and the weekdays the business does not open.
/// Compiled-in defaults; validated once at startup.
#[derive(Debug, Clone)]
pub struct SchedulePolicy {
    pub search_window_days: i64,
    pub slot_duration_hours: u32,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub excluded_weekdays: HashSet<Weekday>,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            search_window_days: 30,
            slot_duration_hours: 2,
            work_start_hour: 8,
            work_end_hour: 18,
            excluded_weekdays: HashSet::from([Weekday::Sun]),
        }
    }
}

impl SchedulePolicy {
    /// Reject nonsensical constants up front so the engine can never produce
    /// an empty-by-accident or unbounded result.
    pub fn validate(&self) -> Result<(), AvailabilityError> {
        if self.search_window_days <= 0 {
            return Err(AvailabilityError::InvalidPolicy(
                "search window must be at least one day".to_string(),
            ));
        }
        if self.slot_duration_hours == 0 {
            return Err(AvailabilityError::InvalidPolicy(
                "slot duration must be at least one hour".to_string(),
            ));
        }
        if self.work_end_hour > 24 {
            return Err(AvailabilityError::InvalidPolicy(
                "working hours must fall within a single day".to_string(),
            ));
        }
        if self.work_start_hour >= self.work_end_hour {
            return Err(AvailabilityError::InvalidPolicy(
                "work start hour must be before work end hour".to_string(),
            ));
        }
        Ok(())
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Invalid schedule policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid blocked range: {0}")]
    InvalidRange(String),

    #[error("Blocked range not found")]
    BlockNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
