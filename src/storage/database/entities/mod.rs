//! SeaORM entities

pub mod download;
pub mod event;
pub mod media_cache;
pub mod user;

pub use download::Entity as Download;
pub use event::Entity as Event;
pub use media_cache::Entity as MediaCache;
pub use user::Entity as User;
