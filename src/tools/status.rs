//! Caltrack Status Tool
//!
//! Provides runtime status information about the caltrack service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Calorie tracking instructions for AI assistants
pub const TRACKING_INSTRUCTIONS: &str = r#"
# Caltrack Usage Instructions

This guide explains how to track calories and macros with the caltrack tools.

## Overview

Caltrack keeps a single biometric profile and a log of meals, water, and
barcode scans. The daily calorie budget is derived from the profile with the
Mifflin-St Jeor equation and split into protein/carb/fat gram targets based
on the user's goal.

## Profile Setup

Before budget tools work, the profile must be complete:

```
update_profile(
  weight_kg: 80,
  height_cm: 180,
  date_of_birth: "1996-06-15",
  sex: "male",
  activity_level: "moderate",
  goal: "maintain"
)
```

- `activity_level`: sedentary, light, moderate, active, extra_active
- `goal`: lose_weight, maintain, gain_muscle
- The cached `daily_calorie_goal` is recomputed automatically whenever a
  biometric field changes. Never set it directly.
- Changing only `goal` does not change `daily_calorie_goal`; the goal
  adjustment (±300 kcal) is applied when targets are requested.

## Logging Food

Two paths:

1. **Scanned products** - `lookup_food(barcode)` previews per-100 nutrition,
   `log_scanned_food(barcode, quantity)` logs a portion. Quantities are in
   grams (or millilitres for liquid products); nutrition is scaled by
   quantity/100.
2. **Manual entries** - `log_meal` with absolute values for the portion
   actually eaten. Do NOT pass per-100 values here.

Portion quantities must be greater than 0.

## Checking Progress

`day_progress(date: "2026-08-20")` returns targets, consumed totals, and
remaining amounts for the day. Remaining values go negative when the user is
over budget; report that honestly rather than clamping to zero.

## Water

`add_water(ml: 250)` logs intake; `get_water(date)` sums a day.

## Notes

- Dates use ISO format: YYYY-MM-DD
- Timestamps default to current time if not provided
- Every successful barcode lookup is recorded in scan history
"#;

/// Runtime status of the caltrack service
#[derive(Debug, Clone, Serialize)]
pub struct CaltrackStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> CaltrackStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        CaltrackStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_build_and_process_info() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/caltrack.db"));
        let status = tracker.get_status();

        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(status.process_id, std::process::id());
        assert!(status.database_size_bytes.is_none());
    }
}
