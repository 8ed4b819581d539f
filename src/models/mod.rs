pub mod granularity;
pub mod record;

pub use granularity::*;
pub use record::*;
