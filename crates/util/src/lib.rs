mod environment;
mod path_processing;
mod text_processing;

pub use environment::non_empty_env;
pub use path_processing::expand_tilde;
pub use text_processing::{redact_sensitive, redact_sensitive_with};
