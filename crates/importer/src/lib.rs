//! Import of third-party event listings into the catalog.
//!
//! [`ListingSource`] fetches raw records ([`KudaGoClient`] in production),
//! [`ImportCatalog`] is the write side, and [`Importer`] maps one onto the
//! other.

pub mod catalog;
pub mod error;
pub mod import;
pub mod kudago;
pub mod source;

pub use catalog::{ImportCatalog, PgImportCatalog};
pub use error::ImportError;
pub use import::Importer;
pub use kudago::{KudaGoClient, DEFAULT_BASE_URL};
pub use source::{ListingSource, RawCoords, RawDate, RawImage, RawListing, RawPlace};
