pub mod health;
pub mod requests;
pub mod responses;

pub use health::*;
pub use requests::*;
pub use responses::*;
