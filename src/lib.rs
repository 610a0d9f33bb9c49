#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Rail-Card-Core is the logic behind a dashboard card that lists upcoming
//! rail departures.
//!
//! The host dashboard pushes a flat snapshot of entity states; the card finds
//! its departure-board sensors in that snapshot by id suffix, either under a
//! legacy name prefix or within the entities of one registry device, and
//! assembles a gap-free list of departure rows from them. Rendering, the
//! configuration editor and the registry fetch plumbing sit on top of that
//! pure core.

/// Crate version, reported by hosts in their load banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Shared aliases and the departure status enum.
pub mod types;

// Snapshot and departure row data structures.
pub mod primitives;

pub use primitives::*;

pub mod error;

// Sensor naming convention and addressing modes.
pub mod addressing;

pub mod resolver;

pub mod assembler;

// One-shot loading gate for registry data.
pub mod gate;

pub mod registry;

pub mod config;

pub mod view;

pub mod card;

pub mod editor;

#[cfg(feature = "tracing-subscriber")]
pub mod logging;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use addressing::{AddressingMode, Field};
pub use assembler::assemble_rows;
pub use card::{RailCard, Rendered, ScopeTicket};
pub use config::CardConfig;
pub use editor::{CardEditor, ConfigChanged};
pub use error::{CardError, RegistryError};
pub use registry::{DeviceScope, RegistryService};
pub use resolver::{resolve, Resolver, ScopeView};
pub use view::{BoardStatus, CardView};
