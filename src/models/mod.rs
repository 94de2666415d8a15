mod group;
mod instance;
mod settings;

pub use group::Group;
pub use instance::{Instance, InstanceType};
pub use settings::{SelectionAlgorithm, Settings};
