mod user;

pub use user::{UserKey, UserMut, UserRef};
pub(crate) use user::{User, UserStatus};
