pub mod ports;
pub mod service;
pub mod upload;

pub use ports::{DocumentStore, ObjectStore};
pub use service::{CatalogService, MutationOutcome};
pub use upload::NewImage;
