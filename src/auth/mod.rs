pub mod extractor;

pub use extractor::{extract_token, AuthUser};
