pub mod error;
pub mod locator;
pub mod result;
pub mod store;

pub use error::StoreError;
pub use locator::Locator;
pub use result::ConfigCandidate;
pub use store::{ConfigStore, FsStore};
