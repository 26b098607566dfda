//! Headless front end for the crawler core: text commands, script playback and file
//! locations shared by the `crawler` and `fuzz` binaries.

pub mod command_text;
pub mod paths;
pub mod play;

pub use command_text::{Line, ParseError, format_command, parse_line};
pub use play::{OutputFormat, PlaySummary, render, run_script, status_line};
