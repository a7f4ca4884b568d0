mod types;

pub use types::{FolioError, Result};
