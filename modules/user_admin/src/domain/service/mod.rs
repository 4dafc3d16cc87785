//! Domain services with business rules for profiles and users.
//! They depend only on the repository ports, not on infra types.

mod profiles;
mod users;

pub use profiles::ProfilesService;
pub use users::UsersService;
