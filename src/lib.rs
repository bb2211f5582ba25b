pub mod codec;
pub mod delimited;
pub mod detect;
pub mod error;
pub mod model;
pub mod pattern;
pub mod pipeline;
pub mod reduce;
pub mod xlsx;

pub use error::{LayoutFailure, MaxScoresError, Result};
pub use model::*;
