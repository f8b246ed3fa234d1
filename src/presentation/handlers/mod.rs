pub mod interaction_handler;

pub use interaction_handler::InteractionHandler;
