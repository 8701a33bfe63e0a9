pub mod common;
pub mod event;
pub mod feedback;
pub mod note;
pub mod pagination;
pub mod pet;
pub mod status;
pub mod user;

pub use common::*;
pub use event::*;
pub use feedback::*;
pub use note::*;
pub use pagination::*;
pub use pet::*;
pub use status::*;
pub use user::*;
