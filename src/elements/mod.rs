//! Structural model of the girder and its supports

mod frame;
mod material;
mod section;
mod support;

pub use frame::{GirderFrame, StiffnessProvider};
pub use material::Material;
pub use section::Section;
pub use support::SpringSupport;
