pub mod actor;
pub mod events;
pub mod marker;

pub use actor::{ClosedTab, SessionActor, SessionMessage};
pub use events::{EventSender, SessionEvent};
pub use marker::{create_marker_file, StateStore, MARKER_DIR, MARKER_FILE_NAME};
