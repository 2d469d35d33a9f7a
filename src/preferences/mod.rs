mod home;
mod lists;
mod pg;

pub use home::{HomeAddressStore, LocalStorage, HOME_ADDRESS_KEY};
pub use lists::{ErrandListStore, MemoryErrandListStore};
pub use pg::PgErrandListStore;
