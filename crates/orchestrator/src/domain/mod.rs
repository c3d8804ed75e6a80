#![forbid(unsafe_code)]

mod entity;
mod process;

pub use entity::{Entity, EntityKind};
pub use process::Process;
