//! Farm registry persisted under the `my-farms` key

use thiserror::Error;
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

use crate::geometry::Boundary;
use crate::models::{Farm, NewFarm};
use crate::storage::{keys, KeyValueStorage, StorageError};
use crate::types::{now_millis, Coordinates, TimestampMillis};

/// Two locations closer than this in both axes are treated as the same farm
pub const SAME_LOCATION_TOLERANCE_DEG: f64 = 0.01;

#[derive(Debug, Error)]
pub enum FarmError {
    #[error("Invalid farm: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Failed to save farms: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize farms: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type FarmResult<T> = Result<T, FarmError>;

/// Registered farms backed by a [`KeyValueStorage`]
pub struct FarmStore<S> {
    storage: S,
    clock: fn() -> TimestampMillis,
}

impl<S: KeyValueStorage> FarmStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            clock: now_millis,
        }
    }

    /// Replace the time source used to assign farm ids
    pub fn with_clock(mut self, clock: fn() -> TimestampMillis) -> Self {
        self.clock = clock;
        self
    }

    /// All farms in registration order, with areas recomputed from boundaries
    pub fn list(&self) -> Vec<Farm> {
        let raw = match self.storage.get(keys::FARMS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Error reading farms");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Farm>>(&raw) {
            Ok(mut farms) => {
                farms.iter_mut().for_each(Farm::refresh_area);
                farms
            }
            Err(e) => {
                warn!(error = %e, "Stored farms are malformed, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<Farm> {
        self.list().into_iter().find(|f| f.id == id)
    }

    /// Register a farm and return it with its assigned id
    pub fn add(&self, input: NewFarm) -> FarmResult<Farm> {
        input.validate()?;

        let mut farms = self.list();
        let next_free = farms.iter().map(|f| f.id + 1).max().unwrap_or(0);
        let id = (self.clock)().max(next_free);

        let farm = input.into_farm(id);
        farms.push(farm.clone());
        self.save_all(&farms)?;

        debug!(id, name = %farm.name, "Farm added");
        Ok(farm)
    }

    /// Replace a farm's boundary; returns the updated farm, or `None` if absent
    pub fn set_boundary(&self, id: i64, boundary: Option<Boundary>) -> FarmResult<Option<Farm>> {
        let mut farms = self.list();
        let Some(farm) = farms.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };

        farm.set_boundary(boundary);
        let updated = farm.clone();
        self.save_all(&farms)?;
        Ok(Some(updated))
    }

    /// Remove a farm; returns false when no farm has `id`
    pub fn remove(&self, id: i64) -> FarmResult<bool> {
        let mut farms = self.list();
        let before = farms.len();
        farms.retain(|f| f.id != id);
        if farms.len() == before {
            return Ok(false);
        }
        self.save_all(&farms)?;
        Ok(true)
    }

    /// First farm registered at roughly the same location
    pub fn find_near(&self, coordinates: &Coordinates) -> Option<Farm> {
        self.list()
            .into_iter()
            .find(|f| f.coordinates.is_near(coordinates, SAME_LOCATION_TOLERANCE_DEG))
    }

    /// First farm with exactly this display name
    pub fn find_by_name(&self, name: &str) -> Option<Farm> {
        self.list().into_iter().find(|f| f.name == name)
    }

    pub fn total_area_acres(&self) -> f64 {
        self.list().iter().map(|f| f.area_value).sum()
    }

    pub fn save_all(&self, farms: &[Farm]) -> FarmResult<()> {
        let json = serde_json::to_string(farms)?;
        self.storage.set(keys::FARMS, &json)?;
        Ok(())
    }
}
