//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod appointment;
pub mod user;

#[allow(unused_imports)]
pub use appointment::{Entity as AppointmentEntity, Model as AppointmentModel};
#[allow(unused_imports)]
pub use user::{Entity as UserEntity, Model as UserModel};
