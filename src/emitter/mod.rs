//! Output generation

mod yaml;

pub use yaml::YamlEmitter;
