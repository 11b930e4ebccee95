//! Partial overlays of [`ViewSettings`].
//!
//! Each settings group is patched independently. A field either leaves the
//! underlying value alone, clears it, or replaces it wholesale; there is no
//! deep merge inside a group.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::types::{Filter, LimitTo, OrderBy, ViewSettings};

/// Change to a single optional settings group.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPatch<T> {
    /// Keep whatever the underlying settings hold.
    Unchanged,
    /// Explicitly remove the group.
    Clear,
    /// Replace the group.
    Set(T),
}

impl<T> Default for FieldPatch<T> {
    fn default() -> Self {
        FieldPatch::Unchanged
    }
}

impl<T> FieldPatch<T> {
    /// `None` clears, `Some` sets.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => FieldPatch::Set(value),
            None => FieldPatch::Clear,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldPatch::Unchanged)
    }

    /// Overlays `later` on `self`; `later` wins unless it is `Unchanged`.
    pub fn merge(self, later: FieldPatch<T>) -> FieldPatch<T> {
        match later {
            FieldPatch::Unchanged => self,
            other => other,
        }
    }

    pub fn apply(&self, current: &Option<T>) -> Option<T>
    where
        T: Clone,
    {
        match self {
            FieldPatch::Unchanged => current.clone(),
            FieldPatch::Clear => None,
            FieldPatch::Set(value) => Some(value.clone()),
        }
    }
}

impl<T: Serialize> Serialize for FieldPatch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldPatch::Set(value) => serializer.serialize_some(value),
            FieldPatch::Unchanged | FieldPatch::Clear => serializer.serialize_none(),
        }
    }
}

// Absent keys never reach this impl (`#[serde(default)]` yields `Unchanged`),
// so a present `null` means `Clear`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldPatch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(FieldPatch::from_option)
    }
}

/// Pending, not yet committed changes to the view settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "FieldPatch::is_unchanged")]
    pub order_by: FieldPatch<OrderBy>,
    #[serde(default, skip_serializing_if = "FieldPatch::is_unchanged")]
    pub limit_to: FieldPatch<LimitTo>,
    #[serde(default, skip_serializing_if = "FieldPatch::is_unchanged")]
    pub filter: FieldPatch<Filter>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A patch that sets or clears every group, so applying it yields
    /// exactly `settings` regardless of the base.
    pub fn replacing(settings: &ViewSettings) -> Self {
        Self {
            order_by: FieldPatch::from_option(settings.order_by.clone()),
            limit_to: FieldPatch::from_option(settings.limit_to),
            filter: FieldPatch::from_option(settings.filter.clone()),
        }
    }

    pub fn with_order_by(mut self, order_by: Option<OrderBy>) -> Self {
        self.order_by = FieldPatch::from_option(order_by);
        self
    }

    pub fn with_limit_to(mut self, limit_to: Option<LimitTo>) -> Self {
        self.limit_to = FieldPatch::from_option(limit_to);
        self
    }

    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = FieldPatch::from_option(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.order_by.is_unchanged() && self.limit_to.is_unchanged() && self.filter.is_unchanged()
    }

    /// Field-by-field overlay; fields touched by `later` win.
    pub fn merge(self, later: SettingsPatch) -> SettingsPatch {
        SettingsPatch {
            order_by: self.order_by.merge(later.order_by),
            limit_to: self.limit_to.merge(later.limit_to),
            filter: self.filter.merge(later.filter),
        }
    }

    pub fn apply_to(&self, settings: &ViewSettings) -> ViewSettings {
        ViewSettings {
            order_by: self.order_by.apply(&settings.order_by),
            limit_to: self.limit_to.apply(&settings.limit_to),
            filter: self.filter.apply(&settings.filter),
        }
    }
}
