use anyhow::Result;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AvailabilityError, BlockedRange, CreateBlockedRangeRequest};

/// Administration of blocked time ranges.
pub struct BlockAdminService {
    supabase: SupabaseClient,
}

impl BlockAdminService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_block(
        &self,
        request: CreateBlockedRangeRequest,
        auth_token: &str,
    ) -> Result<BlockedRange> {
        if request.fecha_hora_inicio >= request.fecha_hora_fin {
            return Err(AvailabilityError::InvalidRange(
                "range start must be before range end".to_string(),
            )
            .into());
        }

        debug!(
            "Blocking range {} - {}",
            request.fecha_hora_inicio, request.fecha_hora_fin
        );

        let block_data = json!({
            "fecha_hora_inicio": request.fecha_hora_inicio,
            "fecha_hora_fin": request.fecha_hora_fin,
            "motivo": request.motivo,
        });

        let result: Vec<BlockedRange> = self
            .supabase
            .insert("bloqueos_disponibilidad", Some(auth_token), block_data)
            .await?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| AvailabilityError::DatabaseError("insert returned no row".to_string()).into())
    }

    pub async fn list_blocks(&self, auth_token: &str) -> Result<Vec<BlockedRange>> {
        let path = "/rest/v1/bloqueos_disponibilidad?select=id,fecha_hora_inicio,fecha_hora_fin,motivo&order=fecha_hora_inicio.desc";

        let blocks: Vec<BlockedRange> = self
            .supabase
            .request(Method::GET, path, Some(auth_token), None)
            .await?;

        Ok(blocks)
    }

    pub async fn delete_block(&self, block_id: i64, auth_token: &str) -> Result<()> {
        debug!("Deleting blocked range {}", block_id);

        let path = format!("/rest/v1/bloqueos_disponibilidad?id=eq.{}", block_id);
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let deleted: Vec<BlockedRange> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await?;

        if deleted.is_empty() {
            return Err(AvailabilityError::BlockNotFound.into());
        }

        Ok(())
    }
}
