pub mod identity;

pub use identity::{MaybeUserId, UserId};
