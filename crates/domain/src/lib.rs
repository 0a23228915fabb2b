#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod catalog;
mod composer;
mod error;
mod exercise;
mod history;
mod migration;
mod muscle;
mod name;
mod service;
mod settings;
mod stats;
mod training;
mod user;
mod variation;
mod workout_session;

pub use catalog::*;
pub use composer::*;
pub use error::*;
pub use exercise::*;
pub use history::*;
pub use migration::*;
pub use muscle::*;
pub use name::*;
pub use service::*;
pub use settings::*;
pub use stats::*;
pub use training::*;
pub use user::*;
pub use variation::*;
pub use workout_session::*;
