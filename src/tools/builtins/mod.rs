pub mod config_file;
pub mod fs;

pub use config_file::{ReadConfigFile, WriteConfigFile};
