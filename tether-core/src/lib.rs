pub mod launch;
pub mod model;
pub mod utils;

pub use launch::{LaunchError, LaunchParams, controller_join_url, resolve_role};
pub use model::*;
