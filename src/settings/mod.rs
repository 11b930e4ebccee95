//! View settings: what slice of the remote collection the grid shows.
//!
//! [`ViewSettings`] is the committed snapshot; [`SettingsPatch`] is the
//! overlay accumulated by mutators while a request is being coalesced.

mod patch;
mod types;

pub use patch::{FieldPatch, SettingsPatch};
pub use types::{Filter, FilterExpression, LimitTo, OrderBy, ViewSettings, DEFAULT_PAGE_SIZE};
