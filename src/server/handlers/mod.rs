pub mod events;
pub mod home;
pub mod lists;
pub mod map;
pub mod places;
pub mod routes;
pub mod session;
