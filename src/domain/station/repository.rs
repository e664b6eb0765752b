//! Charging station repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::ChargingStation;
use crate::domain::DomainResult;

#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Save a new station
    async fn save(&self, station: ChargingStation) -> DomainResult<()>;

    /// Find station by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ChargingStation>>;

    /// Update an existing station (rate or availability toggle)
    async fn update(&self, station: ChargingStation) -> DomainResult<()>;
}
