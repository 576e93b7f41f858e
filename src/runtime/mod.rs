//! Application lifecycle: explicit startup sequencing and shutdown flushing.

pub mod shutdown;
pub mod startup;
