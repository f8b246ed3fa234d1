pub mod interaction_service;

pub use interaction_service::InteractionService;
