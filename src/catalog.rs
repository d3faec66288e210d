//! The sound catalog: the shuffled rotation of playable tracks.
//!
//! Tracks are identified by a stable [`TrackId`] assigned when the catalog is
//! built. Positions in the rotation are derived on demand, so dropping a
//! broken track never makes another id point at the wrong file.

mod listing;
mod model;
mod scan;

pub use listing::{columns, numbered_listing};
pub use model::{Catalog, Track, TrackId};
pub use scan::build;
