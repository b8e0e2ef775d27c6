pub mod error;
pub mod exchange;
pub mod traits;
pub mod types;

pub use error::*;
pub use exchange::*;
pub use traits::*;
pub use types::*;
