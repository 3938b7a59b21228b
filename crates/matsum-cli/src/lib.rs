pub mod app;
pub mod args;
pub mod config;
pub mod logging;
pub mod prompt;

pub use app::run;
pub use args::Cli;
pub use config::{FileConfig, Mode, Settings};
