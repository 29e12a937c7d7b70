//! RankRoomsHandler - Loads rooms, applies hard filters, and ranks them.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::ahp::{
    AggregationMethod, AhpResult, FacilityFilter, PreferenceSet, UserRequirements,
};
use crate::domain::foundation::DomainError;
use crate::ports::RoomSource;

/// Command to rank the rooms of a source.
#[derive(Debug, Clone, Default)]
pub struct RankRoomsCommand {
    /// Falls back to the configured method when absent.
    pub method: Option<AggregationMethod>,
    pub preferences: PreferenceSet,
    /// Overrides requirements carried by the room batch.
    pub requirements: Option<UserRequirements>,
    pub filter: FacilityFilter,
}

/// Result of a ranking run.
#[derive(Debug, Clone)]
pub struct RankRoomsResult {
    pub result: AhpResult,
    /// Rooms dropped by the facility filter.
    pub excluded: usize,
}

/// Handler for ranking rooms.
pub struct RankRoomsHandler {
    source: Arc<dyn RoomSource>,
    config: AppConfig,
}

impl RankRoomsHandler {
    pub fn new(source: Arc<dyn RoomSource>, config: AppConfig) -> Self {
        Self { source, config }
    }

    pub fn handle(&self, cmd: RankRoomsCommand) -> Result<RankRoomsResult, DomainError> {
        // 1. Load rooms
        let batch = self.source.load()?;
        let requirements = cmd
            .requirements
            .or(batch.requirements)
            .unwrap_or_default();

        // 2. Apply hard facility filter
        let total = batch.rooms.len();
        let rooms = cmd.filter.apply(batch.rooms);
        let excluded = total - rooms.len();
        if excluded > 0 {
            tracing::info!(excluded, remaining = rooms.len(), "Facility filter excluded rooms");
        }

        // 3. Build engine and apply preferences
        let mut engine = self.config.engine()?;
        if !cmd.preferences.is_empty() {
            engine.set_preferences(&cmd.preferences.main, &cmd.preferences.sub)?;
        }
        engine.set_requirements(requirements);
        engine.load_rooms(rooms);

        // 4. Evaluate
        let method = cmd.method.unwrap_or(self.config.aggregation.method);
        let result = engine.evaluate(method)?;

        Ok(RankRoomsResult { result, excluded })
    }
}
