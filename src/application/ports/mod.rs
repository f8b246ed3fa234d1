pub mod identity;
pub mod interaction_store;

pub use identity::IdentitySource;
pub use interaction_store::InteractionStore;
