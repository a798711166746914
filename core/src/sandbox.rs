//! An in-memory lot that implements every host capability.
//!
//! Backs the console tool and the test suite. Object ids are allocated
//! from a counter and never reused. Faults can be injected per object and
//! per definition to exercise the best-effort paths.

use crate::{
    error::{HostError, HostResult},
    host::{EntityFactory, LiveEntity, LotObjectEnumerator, ZoneContext},
    season::{SeasonControl, SeasonServices, SeasonSetSource, SeasonType},
    types::{DefinitionId, Level, Location, ObjectId, Quaternion, SurfaceRef, Transform, Vec3, ZoneId},
};
use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

/// How a catalog definition misbehaves when built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFault {
    /// `instantiate` raises.
    InstantiationError,
    /// `instantiate` returns no object.
    Declines,
    /// The object is created but refuses its placement.
    PlacementError,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    name:  String,
    fault: Option<DefinitionFault>,
}

#[derive(Debug, Clone)]
struct SandboxObject {
    definition:        Option<DefinitionId>,
    transform:         Transform,
    level:             Level,
    surface:           Option<SurfaceRef>,
    actor:             bool,
    undestroyable:     bool,
    unreadable:        bool,
    rejects_placement: bool,
}

#[derive(Debug, Default)]
struct LotState {
    // Ids only grow, so key order is creation order.
    objects: BTreeMap<ObjectId, SandboxObject>,
    next_id: u64,
}

impl LotState {
    fn insert(&mut self, object: SandboxObject) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        self.objects.insert(id, object);
        id
    }
}

/// Read-only view of one sandbox object, for inspection and assertions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectView {
    pub id:         ObjectId,
    pub definition: Option<DefinitionId>,
    pub transform:  Transform,
    pub level:      Level,
    pub surface:    Option<SurfaceRef>,
    pub actor:      bool,
}

/// A handle to one sandbox object. Reads and writes go through to the lot.
#[derive(Debug, Clone)]
pub struct SandboxHandle {
    id:    ObjectId,
    state: Rc<RefCell<LotState>>,
}

impl SandboxHandle {
    fn with_object<T>(&self, f: impl FnOnce(&SandboxObject) -> T) -> HostResult<T> {
        let state = self.state.borrow();
        state
            .objects
            .get(&self.id)
            .map(f)
            .ok_or_else(|| HostError::Attribute(format!("{} no longer exists", self.id)))
    }
}

impl LiveEntity for SandboxHandle {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn is_actor(&self) -> bool {
        self.with_object(|o| o.actor).unwrap_or(false)
    }

    fn definition_id(&self) -> Option<DefinitionId> {
        self.with_object(|o| o.definition).ok().flatten()
    }

    fn transform(&self) -> HostResult<Transform> {
        match self.with_object(|o| (o.unreadable, o.transform))? {
            (true, _) => Err(HostError::Attribute(format!("{} transform unreadable", self.id))),
            (false, transform) => Ok(transform),
        }
    }

    fn level(&self) -> HostResult<Level> {
        self.with_object(|o| o.level)
    }

    fn set_location(&mut self, location: Location) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        let object = state
            .objects
            .get_mut(&self.id)
            .ok_or_else(|| HostError::Placement(format!("{} no longer exists", self.id)))?;
        if object.rejects_placement {
            return Err(HostError::Placement(format!("{} rejected its location", self.id)));
        }
        object.transform = location.transform;
        object.level = location.surface.level;
        object.surface = Some(location.surface);
        Ok(())
    }
}

/// A resolved catalog definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxDefinition {
    pub id:   DefinitionId,
    pub name: String,
    fault:    Option<DefinitionFault>,
}

/// Sandbox season and weather service. Records every call it receives.
#[derive(Debug, Default)]
pub struct SandboxSeasons {
    pub current:           Option<SeasonType>,
    pub last_source:       Option<SeasonSetSource>,
    pub region_resets:     usize,
    pub forecast_resets:   usize,
    pub fail_next_change:  bool,
}

impl SeasonControl for SandboxSeasons {
    fn reset_region_season_params(&mut self) -> HostResult<()> {
        self.region_resets += 1;
        Ok(())
    }

    fn set_season(&mut self, season: SeasonType, source: SeasonSetSource) -> HostResult<()> {
        if std::mem::take(&mut self.fail_next_change) {
            return Err(HostError::ServiceUnavailable("SeasonService"));
        }
        self.current = Some(season);
        self.last_source = Some(source);
        Ok(())
    }

    fn reset_forecasts(&mut self) -> HostResult<()> {
        self.forecast_resets += 1;
        Ok(())
    }
}

pub struct SandboxLot {
    state:                Rc<RefCell<LotState>>,
    catalog:              BTreeMap<DefinitionId, CatalogEntry>,
    zone_id:              ZoneId,
    seasons:              SandboxSeasons,
    season_service_ready: bool,
    instantiations:       usize,
    destroy_causes:       Vec<String>,
}

impl SandboxLot {
    pub fn new(zone_id: ZoneId) -> Self {
        Self {
            state:                Rc::new(RefCell::new(LotState::default())),
            catalog:              BTreeMap::new(),
            zone_id,
            seasons:              SandboxSeasons::default(),
            season_service_ready: true,
            instantiations:       0,
            destroy_causes:       Vec::new(),
        }
    }

    /// A small furnished lot with two sims, used by the console.
    pub fn demo() -> Self {
        let mut lot = Self::new(ZoneId(1));
        lot.define(DefinitionId(1001), "Pumpkin");
        lot.define(DefinitionId(1002), "Snowman");
        lot.define(DefinitionId(1003), "Flower Bed");
        lot.define(DefinitionId(1004), "Beach Umbrella");
        lot.place(DefinitionId(1003), Vec3::new(2.0, 0.0, 3.0), Quaternion::IDENTITY, Level(0));
        lot.place(DefinitionId(1003), Vec3::new(4.0, 0.0, 3.0), Quaternion::IDENTITY, Level(0));
        lot.place(DefinitionId(1004), Vec3::new(8.5, 0.0, 1.0), Quaternion::new(0.0, 0.7071, 0.0, 0.7071), Level(1));
        lot.place_actor(Vec3::new(5.0, 0.0, 5.0));
        lot.place_actor(Vec3::new(6.0, 0.0, 5.0));
        lot
    }

    // ── Catalog ──────────────────────────────────────────────

    pub fn define(&mut self, id: DefinitionId, name: &str) -> &mut Self {
        self.catalog.insert(id, CatalogEntry { name: name.to_string(), fault: None });
        self
    }

    pub fn define_faulty(&mut self, id: DefinitionId, name: &str, fault: DefinitionFault) -> &mut Self {
        self.catalog.insert(id, CatalogEntry { name: name.to_string(), fault: Some(fault) });
        self
    }

    /// Make a definition unresolvable, as when a content pack is removed.
    pub fn undefine(&mut self, id: DefinitionId) {
        self.catalog.remove(&id);
    }

    // ── Objects ──────────────────────────────────────────────

    /// Put a placeable object on the lot directly.
    pub fn place(&mut self, definition: DefinitionId, position: Vec3, orientation: Quaternion, level: Level) -> ObjectId {
        self.insert(Some(definition), position, orientation, level, false)
    }

    pub fn place_actor(&mut self, position: Vec3) -> ObjectId {
        self.insert(None, position, Quaternion::IDENTITY, Level(0), true)
    }

    /// An object whose definition cannot be resolved.
    pub fn place_without_definition(&mut self, position: Vec3) -> ObjectId {
        self.insert(None, position, Quaternion::IDENTITY, Level(0), false)
    }

    pub fn mark_undestroyable(&mut self, id: ObjectId) {
        if let Some(o) = self.state.borrow_mut().objects.get_mut(&id) {
            o.undestroyable = true;
        }
    }

    pub fn mark_unreadable(&mut self, id: ObjectId) {
        if let Some(o) = self.state.borrow_mut().objects.get_mut(&id) {
            o.unreadable = true;
        }
    }

    pub fn objects(&self) -> Vec<ObjectView> {
        self.state
            .borrow()
            .objects
            .iter()
            .map(|(&id, o)| ObjectView {
                id,
                definition: o.definition,
                transform:  o.transform,
                level:      o.level,
                surface:    o.surface,
                actor:      o.actor,
            })
            .collect()
    }

    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.state.borrow().objects.keys().copied().collect()
    }

    pub fn definition_name(&self, id: DefinitionId) -> Option<&str> {
        self.catalog.get(&id).map(|e| e.name.as_str())
    }

    /// Calls to `instantiate`, including failed ones.
    pub fn instantiations(&self) -> usize {
        self.instantiations
    }

    pub fn destroy_causes(&self) -> &[String] {
        &self.destroy_causes
    }

    // ── Seasons ──────────────────────────────────────────────

    pub fn seasons(&self) -> &SandboxSeasons {
        &self.seasons
    }

    pub fn seasons_mut(&mut self) -> &mut SandboxSeasons {
        &mut self.seasons
    }

    pub fn set_season_service_available(&mut self, available: bool) {
        self.season_service_ready = available;
    }

    fn insert(
        &mut self,
        definition: Option<DefinitionId>,
        position: Vec3,
        orientation: Quaternion,
        level: Level,
        actor: bool,
    ) -> ObjectId {
        self.state.borrow_mut().insert(SandboxObject {
            definition,
            transform: Transform { translation: position, orientation },
            level,
            surface: None,
            actor,
            undestroyable: false,
            unreadable: false,
            rejects_placement: false,
        })
    }

    fn handle(&self, id: ObjectId) -> SandboxHandle {
        SandboxHandle { id, state: Rc::clone(&self.state) }
    }
}

impl LotObjectEnumerator for SandboxLot {
    type Entity = SandboxHandle;

    fn list(&self) -> Vec<SandboxHandle> {
        self.object_ids().into_iter().map(|id| self.handle(id)).collect()
    }

    fn destroy(&mut self, entity: SandboxHandle, cause: &str) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        match state.objects.get(&entity.id) {
            None => return Err(HostError::Destroy(format!("{} does not exist", entity.id))),
            Some(o) if o.undestroyable => {
                return Err(HostError::Destroy(format!("{} refused to be destroyed", entity.id)))
            }
            Some(_) => {}
        }
        state.objects.remove(&entity.id);
        self.destroy_causes.push(cause.to_string());
        Ok(())
    }
}

impl EntityFactory for SandboxLot {
    type Definition = SandboxDefinition;
    type Spawned = SandboxHandle;

    fn resolve_type(&self, id: DefinitionId) -> Option<SandboxDefinition> {
        self.catalog.get(&id).map(|entry| SandboxDefinition {
            id,
            name:  entry.name.clone(),
            fault: entry.fault,
        })
    }

    fn instantiate(&mut self, definition: &SandboxDefinition) -> HostResult<Option<SandboxHandle>> {
        self.instantiations += 1;
        match definition.fault {
            Some(DefinitionFault::InstantiationError) => {
                return Err(HostError::Instantiation(format!("{} could not be built", definition.name)))
            }
            Some(DefinitionFault::Declines) => return Ok(None),
            _ => {}
        }
        let id = self.state.borrow_mut().insert(SandboxObject {
            definition:        Some(definition.id),
            transform:         Transform::default(),
            level:             Level(0),
            surface:           None,
            actor:             false,
            undestroyable:     false,
            unreadable:        false,
            rejects_placement: definition.fault == Some(DefinitionFault::PlacementError),
        });
        Ok(Some(self.handle(id)))
    }
}

impl ZoneContext for SandboxLot {
    fn current_zone_id(&self) -> ZoneId {
        self.zone_id
    }
}

impl SeasonServices for SandboxLot {
    fn season_service(&mut self) -> Option<&mut dyn SeasonControl> {
        if self.season_service_ready {
            Some(&mut self.seasons)
        } else {
            None
        }
    }
}
