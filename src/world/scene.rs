//! In-memory environment
//!
//! Entities live in a dense table indexed by [`EntityId`]. Solid entities are
//! additionally kept in an id-ordered index that is updated on insert and
//! remove, so per-frame queries never scan the whole table.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityIds, SolidityTag, SurfaceKind};
use super::query::{SolidVolume, VisibilitySink, WorldQuery};
use crate::geometry::Volume;

/// A single environment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub label: String,
    pub volume: Volume,
    pub tag: SolidityTag,
    pub surface: SurfaceKind,
    /// 1.0 = fully opaque
    pub visibility: f32,
}

impl Entity {
    fn as_solid(&self) -> SolidVolume {
        SolidVolume {
            id: self.id,
            volume: self.volume,
            tag: self.tag,
            surface: self.surface,
        }
    }
}

/// The static environment the body moves through
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    ids: EntityIds,
    entities: Vec<Option<Entity>>,
    /// Solid entities, sorted by id
    solids: Vec<SolidVolume>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity and return its id
    pub fn insert(
        &mut self,
        label: impl Into<String>,
        volume: Volume,
        tag: SolidityTag,
        surface: SurfaceKind,
    ) -> EntityId {
        let id = self.ids.next_id();
        let entity = Entity {
            id,
            label: label.into(),
            volume,
            tag,
            surface,
            visibility: 1.0,
        };

        if tag.is_solid {
            // Fresh ids are always the largest, so pushing keeps the index sorted
            self.solids.push(entity.as_solid());
        }

        if self.entities.len() <= id.index() {
            self.entities.resize_with(id.index() + 1, || None);
        }
        self.entities[id.index()] = Some(entity);
        id
    }

    /// Convenience for flat, shadow-casting solid boxes
    pub fn insert_solid(&mut self, label: impl Into<String>, center: Vec3, size: Vec3) -> EntityId {
        self.insert(label, Volume::new(center, size), SolidityTag::SOLID, SurfaceKind::Flat)
    }

    /// Remove an entity. Returns the removed entity, if it existed.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.get_mut(id.index())?.take()?;
        if entity.tag.is_solid {
            if let Ok(pos) = self.solids.binary_search_by_key(&id, |s| s.id) {
                self.solids.remove(pos);
            }
        }
        Some(entity)
    }

    /// Replace an entity's volume, keeping the solid index in sync
    pub fn set_volume(&mut self, id: EntityId, volume: Volume) -> bool {
        let Some(entity) = self.entities.get_mut(id.index()).and_then(Option::as_mut) else {
            return false;
        };
        entity.volume = volume;
        if entity.tag.is_solid {
            if let Ok(pos) = self.solids.binary_search_by_key(&id, |s| s.id) {
                self.solids[pos].volume = volume;
            }
        }
        true
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index()).and_then(Option::as_ref)
    }

    /// Current visibility of an entity
    pub fn visibility(&self, id: EntityId) -> Option<f32> {
        self.get(id).map(|e| e.visibility)
    }

    /// Live entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().flatten()
    }

    /// Entities that should be registered with a shadow generator
    pub fn shadow_casters(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter().filter(|e| e.tag.casts_shadows).map(|e| e.id)
    }

    /// First live entity with the given label
    pub fn find(&self, label: &str) -> Option<EntityId> {
        self.iter().find(|e| e.label == label).map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl WorldQuery for Scene {
    fn solid_volumes(&self) -> &[SolidVolume] {
        &self.solids
    }
}

impl VisibilitySink for Scene {
    fn set_visibility(&mut self, id: EntityId, visibility: f32) {
        if let Some(entity) = self.entities.get_mut(id.index()).and_then(Option::as_mut) {
            entity.visibility = visibility;
        }
    }
}
