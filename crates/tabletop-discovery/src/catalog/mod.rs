pub mod boardgames;
pub mod router;

pub use boardgames::{BoardGame, BoardGameCatalog, CatalogError};
pub use router::boardgame_router;
