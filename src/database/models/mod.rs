pub mod category;
pub mod movie;
pub mod stats;
pub mod user;

pub use category::*;
pub use movie::*;
pub use stats::*;
pub use user::*;
