pub mod config;
pub mod error;
pub mod field;
pub mod governor;
pub mod group;
pub mod polynomial;
pub mod reconstruct;
pub mod sss;

pub use config::*;
pub use error::*;
pub use field::*;
pub use governor::*;
pub use group::*;
pub use polynomial::*;
pub use reconstruct::*;
pub use sss::*;
