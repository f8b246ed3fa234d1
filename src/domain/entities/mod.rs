pub mod comment;
pub mod interaction;
pub mod viewer;

pub use comment::{Comment, NewComment};
pub use interaction::{LikeState, LoadedInteractions, PostInteractions, ToggleKind, TogglePhase};
pub use viewer::Viewer;
