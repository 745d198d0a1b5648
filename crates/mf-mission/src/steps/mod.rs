//! Steps shared by the segment catalog.
//!
//! Every step has the signature `fn(&mut Segment) -> MissionResult<()>` and reads
//! only what earlier steps in the same pass have written.

pub mod aerodynamics;
pub mod converge;
pub mod energy;
pub mod frames;
pub mod numerics;
pub mod residuals;
pub mod unknowns;
pub mod weights;
