mod types;

pub use types::{ErrorKind, MediaError, RuleError, TransformError};
