//! Placement records: a detached description of one placed object.

use crate::types::{DefinitionId, Level, Quaternion, SurfaceRef, Transform, Vec3, ZoneId, SurfaceType, Location};
use serde::{Deserialize, Serialize};

/// What a captured object was and where it stood.
///
/// Holds no handle to the live object it was read from, so a record stays
/// valid after that object is destroyed. Fields are read-only once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    definition_id: DefinitionId,
    position:      Vec3,
    orientation:   Quaternion,
    level:         Level,
}

impl PlacementRecord {
    pub fn new(
        definition_id: DefinitionId,
        position: Vec3,
        orientation: Quaternion,
        level: Level,
    ) -> Self {
        Self { definition_id, position, orientation, level }
    }

    pub fn definition_id(&self) -> DefinitionId { self.definition_id }
    pub fn position(&self) -> Vec3 { self.position }
    pub fn orientation(&self) -> Quaternion { self.orientation }
    pub fn level(&self) -> Level { self.level }

    pub fn transform(&self) -> Transform {
        Transform {
            translation: self.position,
            orientation: self.orientation,
        }
    }

    /// Full placement for this record inside `zone_id`.
    pub fn location_in(&self, zone_id: ZoneId, surface_type: SurfaceType) -> Location {
        Location {
            transform: self.transform(),
            surface: SurfaceRef {
                zone_id,
                level: self.level,
                surface_type,
            },
        }
    }
}
