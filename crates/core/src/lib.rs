#![forbid(unsafe_code)]

pub mod error;
pub mod layout;
pub mod model;
pub mod session;
pub mod time;
pub mod timer;
pub mod trial;

pub use error::SessionError;
pub use time::Clock;
