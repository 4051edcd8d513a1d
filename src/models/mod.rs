//! Data models for the Jiskefet logbook.
//!
//! These records mirror the REST resources exactly; wire names are camelCase.

mod attachment;
mod draft;
mod list;
mod log;
mod overview;
mod run;
mod setting;
mod token;
mod user;

pub use attachment::*;
pub use draft::*;
pub use list::*;
pub use log::*;
pub use overview::*;
pub use run::*;
pub use setting::*;
pub use token::*;
pub use user::*;

use std::fmt::Debug;

/// A record held in an entity store, addressable by its identifier.
pub trait Entity: Clone + Debug + Send + 'static {
    type Id: Clone + Debug + PartialEq;

    /// Name used in log lines.
    const NAME: &'static str;

    fn id(&self) -> Self::Id;
}
