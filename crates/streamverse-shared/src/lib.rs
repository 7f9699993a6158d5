//! Domain types shared by the StreamVerse store, catalog and client crates.

pub mod constants;
pub mod entitlement;
pub mod error;
pub mod records;
pub mod session;
pub mod types;

pub use entitlement::{Access, Entitlement, Plan};
pub use error::{AuthError, AuthFlow};
pub use records::{Favorite, NewFavorite, NewPayment, PaymentRecord, PaymentStatus};
pub use session::{Profile, Session};
pub use types::{FavoriteId, PaymentId, TitleId, UserId};
