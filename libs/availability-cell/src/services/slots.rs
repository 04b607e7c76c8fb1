use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::{BlockedRange, SchedulePolicy};

/// Enumerate every bookable slot from `now` through the policy's search
/// window.
///
/// Pure over its inputs: `now` is injected by the caller, never read from the
/// ambient clock, so identical inputs always yield identical output. Slots
/// come back in generation order (days ascending, hours ascending within each
/// day).
///
/// Occupancy is tested by exact-instant equality against the confirmed
/// appointment timestamps, not by interval overlap. Bookings are created from
/// the slot list this function produces, so stored appointment times are
/// assumed to be grid-aligned; an off-grid timestamp would not shadow any
/// slot.
pub fn compute_available_slots(
    now: DateTime<Utc>,
    policy: &SchedulePolicy,
    confirmed: &[DateTime<Utc>],
    blocks: &[BlockedRange],
) -> Vec<DateTime<Utc>> {
    let occupied: HashSet<DateTime<Utc>> = confirmed.iter().copied().collect();

    let mut slots = Vec::new();

    for offset in 0..policy.search_window_days {
        let day = now + Duration::days(offset);
        if policy.excluded_weekdays.contains(&day.weekday()) {
            continue;
        }

        let mut hour = policy.work_start_hour;
        while hour < policy.work_end_hour {
            // hour < work_end_hour <= 24 holds for any validated policy
            let candidate = day.date_naive().and_hms_opt(hour, 0, 0).unwrap().and_utc();
            hour += policy.slot_duration_hours;

            // Against the exact instant, not start-of-day: a slot earlier
            // today that has already passed is excluded, a later one remains.
            if candidate < now {
                continue;
            }
            if occupied.contains(&candidate) {
                continue;
            }
            // Half-open test: a slot at a range's end is free, at its start
            // it is blocked.
            let is_blocked = blocks.iter().any(|block| {
                block.fecha_hora_inicio <= candidate && candidate < block.fecha_hora_fin
            });
            if is_blocked {
                continue;
            }

            slots.push(candidate);
        }
    }

    slots
}
