pub mod directions;
pub mod google_identity;
pub mod google_maps;
