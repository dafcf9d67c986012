pub mod clipboard;
pub mod containment;
pub mod projects;
pub mod selection;
pub mod store;

pub use clipboard::{Clipboard, PASTE_OFFSET};
pub use containment::DropOutcome;
pub use selection::{DeleteOutcome, DeletePlan};
pub use store::{CanvasStore, EdgeChange, NodeChange};
