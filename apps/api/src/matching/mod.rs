// Career matching: feature alignment and inference over the pretrained forest.
// Artifacts are loaded once into a shared bundle; handlers never touch the disk.

pub mod artifacts;
pub mod catalog;
pub mod encoders;
pub mod explain;
pub mod features;
pub mod forest;
pub mod handlers;
pub mod pipeline;
pub mod predictor;

#[cfg(test)]
pub(crate) mod fixtures;
