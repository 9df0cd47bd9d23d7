//! Headless driver for the voxel world: walks a physics body through the
//! terrain, streams chunks around it and reports what happened.

pub mod report;
pub mod runner;
pub mod scenes;
