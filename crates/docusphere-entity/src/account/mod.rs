//! Account domain entities.

pub mod identity;
pub mod model;
pub mod role;

pub use identity::Identity;
pub use model::{Account, CreateAccount, UpdateAccount, default_avatar_url};
pub use role::AccountRole;
