//! Capabilities the snapshot core needs from the host game.
//!
//! RULE: the core never names a concrete host type. Anything that can list,
//! destroy, resolve, instantiate, and place objects can back it.

use crate::{
    error::HostResult,
    types::{DefinitionId, Level, Location, ObjectId, Transform, ZoneId},
};

/// A handle to one live object, held only for the duration of a call.
pub trait LiveEntity {
    fn object_id(&self) -> ObjectId;

    /// Sims and other actor-class objects. Never captured, never cleared.
    fn is_actor(&self) -> bool;

    /// `None` when the object has no resolvable definition.
    fn definition_id(&self) -> Option<DefinitionId>;

    fn transform(&self) -> HostResult<Transform>;

    fn level(&self) -> HostResult<Level>;

    /// Move the object. Transform and surface are applied together.
    fn set_location(&mut self, location: Location) -> HostResult<()>;
}

/// Lists and removes the live objects on the current lot.
pub trait LotObjectEnumerator {
    type Entity: LiveEntity;

    /// Every live object, in the host's enumeration order.
    fn list(&self) -> Vec<Self::Entity>;

    fn destroy(&mut self, entity: Self::Entity, cause: &str) -> HostResult<()>;
}

/// Builds new objects from definitions.
pub trait EntityFactory {
    type Definition;
    type Spawned: LiveEntity;

    fn resolve_type(&self, id: DefinitionId) -> Option<Self::Definition>;

    /// Create an object with a freshly allocated id.
    /// `Ok(None)` means the host declined without raising.
    fn instantiate(&mut self, definition: &Self::Definition) -> HostResult<Option<Self::Spawned>>;
}

/// Spatial context of the current call.
pub trait ZoneContext {
    fn current_zone_id(&self) -> ZoneId;
}

/// Everything capture and restore need, in one bound.
pub trait LotHost: LotObjectEnumerator + EntityFactory + ZoneContext {}

impl<T> LotHost for T where T: LotObjectEnumerator + EntityFactory + ZoneContext {}
