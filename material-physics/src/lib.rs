//! Fabric composition analysis and physics preset mapping.
//!
//! Turns free-text material descriptions ("Wool 90%, Cashmere 10%") into
//! the physically-based rendering preset a cloth renderer consumes. The
//! preset library is a process-wide constant, safe for concurrent reads.

pub mod catalog;
pub mod parser;
pub mod presets;
pub mod resolver;

pub use catalog::{Brand, Category, ProductRecord};
pub use parser::{MaterialComposition, parse_composition};
pub use presets::{PhysicsPreset, preset_for};
pub use resolver::{ResolvedMaterial, resolve};
