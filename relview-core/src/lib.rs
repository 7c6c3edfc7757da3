pub mod host;
pub mod related;
pub mod session;
pub mod settings;
pub mod view;

// Public library API - front-ends embedding the session core should only
// need these types.
pub use host::{EditorHost, ShowOptions, Tab, TabGroup, TabRef, ViewColumn};
pub use related::{FileSearch, GlobSearch, ResolveError};
pub use session::{ClosedTab, SessionActor, SessionEvent, SessionMessage, StateStore};
pub use settings::{ActivationMode, SearchMode, Settings, SettingsManager};
