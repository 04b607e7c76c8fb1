use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AvailabilityError, BlockedRange, SchedulePolicy};
use crate::services::slots::compute_available_slots;

#[derive(Debug, Deserialize)]
struct CitaTimeRow {
    fecha_hora_cita: DateTime<Utc>,
}

pub struct AvailabilityService {
    supabase: SupabaseClient,
    policy: SchedulePolicy,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        // The default policy is validated at startup, so this cannot panic in
        // a running server.
        Self::with_policy(config, SchedulePolicy::default())
            .expect("default schedule policy is valid")
    }

    pub fn with_policy(
        config: &AppConfig,
        policy: SchedulePolicy,
    ) -> Result<Self, AvailabilityError> {
        policy.validate()?;
        Ok(Self {
            supabase: SupabaseClient::new(config),
            policy,
        })
    }

    /// Compute every bookable slot from `now` forward.
    ///
    /// Both reads are issued up front and must complete before generation
    /// begins; a failed read propagates without producing a partial slot
    /// list.
    pub async fn get_available_slots(&self, now: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
        let window_start = now.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc();
        let window_end = (now + Duration::days(self.policy.search_window_days))
            .date_naive()
            .and_hms_opt(23, 59, 59)
            .unwrap()
            .and_utc();

        debug!(
            "Computing availability between {} and {}",
            window_start, window_end
        );

        let citas_path = format!(
            "/rest/v1/citas?select=fecha_hora_cita&estado=eq.confirmada&fecha_hora_cita=gte.{}&fecha_hora_cita=lte.{}",
            window_start.to_rfc3339(),
            window_end.to_rfc3339()
        );
        let bloqueos_path = format!(
            "/rest/v1/bloqueos_disponibilidad?select=id,fecha_hora_inicio,fecha_hora_fin,motivo&fecha_hora_fin=gte.{}",
            window_start.to_rfc3339()
        );

        // No ordering dependency between the two reads
        let (citas, bloqueos): (Vec<CitaTimeRow>, Vec<BlockedRange>) = tokio::try_join!(
            self.supabase.request(Method::GET, &citas_path, None, None),
            self.supabase.request(Method::GET, &bloqueos_path, None, None),
        )?;

        let confirmed: Vec<DateTime<Utc>> = citas.into_iter().map(|c| c.fecha_hora_cita).collect();

        let slots = compute_available_slots(now, &self.policy, &confirmed, &bloqueos);
        debug!("Found {} available slots", slots.len());

        Ok(slots)
    }

    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }
}
