pub mod entities;
pub mod value_objects;

pub use entities::{Comment, LikeState, PostInteractions, ToggleKind, TogglePhase, Viewer};
pub use value_objects::{CommentId, PostId, UserId};
