pub mod identity;

pub use identity::{Identity, USER_ID_COOKIE, issue_identity};
