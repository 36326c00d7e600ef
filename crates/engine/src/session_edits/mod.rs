pub mod actions;
pub mod executor;
pub mod plugin;
pub mod queue;
pub mod result_log;
pub mod results;

pub use actions::*;
pub use executor::{apply_edit, execute_queued_edits};
pub use plugin::SessionEditsPlugin;
pub use queue::*;
pub use result_log::{EditResultLog, LoggedEdit, MAX_LOGGED_EDITS};
pub use results::*;
