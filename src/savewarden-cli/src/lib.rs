//! Savewarden CLI library.
//!
//! - `cli/` - Argument parsing and command dispatch
//! - `bootstrap` - Config location and first-run setup
//! - `*_cmd.rs` - Individual commands
//! - `report` - Rendering of cycle reports
//! - `styled_output` - Tagged, colored terminal lines

pub mod bootstrap;
pub mod cli;
pub mod config_cmd;
pub mod once_cmd;
pub mod report;
pub mod status_cmd;
pub mod styled_output;
pub mod watch_cmd;
