//! Stock middlewares. Each is an ordinary [`crate::Handler`] registered on a
//! group like any other; placing [`Recovery`] first on the root group makes
//! it wrap everything else.

pub(crate) mod logger;
pub(crate) mod recovery;

pub use logger::Logger;
pub use recovery::Recovery;
