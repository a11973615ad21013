//! Entity identifiers and per-entity components

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an environment entity, unique within one [`super::Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Slot in the dense entity table
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id allocator. Ids are never reused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Whether an entity collides and whether it casts shadows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SolidityTag {
    pub is_solid: bool,
    pub casts_shadows: bool,
}

impl SolidityTag {
    /// Collides and casts shadows (ordinary scenery)
    pub const SOLID: Self = Self {
        is_solid: true,
        casts_shadows: true,
    };
    /// Collides but is invisible (collider-only helpers)
    pub const INVISIBLE_SOLID: Self = Self {
        is_solid: true,
        casts_shadows: false,
    };
    /// Visual only
    pub const BACKGROUND: Self = Self {
        is_solid: false,
        casts_shadows: false,
    };

    pub fn with_shadows(mut self, casts_shadows: bool) -> Self {
        self.casts_shadows = casts_shadows;
        self
    }
}

/// What kind of surface a solid presents to the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceKind {
    #[default]
    Flat,
    /// Sloped collider (staircase ramp); rotation recovery lifts the body
    Ramp,
    /// Individual stair tread
    Step,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = EntityIds::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
        assert_eq!(b.index(), a.index() + 1);
    }

    #[test]
    fn test_tag_presets() {
        assert!(SolidityTag::SOLID.is_solid);
        assert!(!SolidityTag::BACKGROUND.is_solid);
        assert!(SolidityTag::BACKGROUND.with_shadows(true).casts_shadows);
        assert_eq!(SurfaceKind::default(), SurfaceKind::Flat);
    }
}
