pub mod gotrue;
pub mod provider;

pub use gotrue::GoTrueIdentity;
pub use provider::{IdentityError, IdentityProvider, IdentityResult, Principal, Session, User};
