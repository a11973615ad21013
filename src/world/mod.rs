//! Environment model
//!
//! - `entity`: ids and per-entity components (solidity, surface kind)
//! - `query`: the traits the controller talks to the world through
//! - `scene`: dense entity table with an incremental solid index
//! - `layout`: collision volumes of the reference courtyard

pub mod entity;
pub mod layout;
pub mod query;
pub mod scene;

pub use entity::{EntityId, EntityIds, SolidityTag, SurfaceKind};
pub use layout::build_courtyard;
pub use query::{RayHit, SolidVolume, VisibilitySink, WorldQuery};
pub use scene::{Entity, Scene};
