//! Server-side paging, sorting and filtering for data grids.
//!
//! A [`ServerDataProvider`](provider::ServerDataProvider) fronts one remote
//! resource. Views call its mutators (`order_by`, `filter`, `page`, ...),
//! which are coalesced into a single debounced GET carrying a query string
//! such as `limit=10&begin=20&orderBy=name&reverse=true&search=abc`. Views
//! read the committed rows and item count back through its accessors.

pub mod config;
pub mod logging;
pub mod pager;
pub mod parser;
pub mod provider;
pub mod serializer;
pub mod settings;
pub mod timer;
pub mod transport;

pub use config::{FetchOrdering, ProviderConfig};
pub use pager::{GridDataSource, Pager};
pub use parser::{GridPage, PassthroughParser, ResponseParser};
pub use provider::{ProviderError, ServerDataProvider, ServerDataProviderFactory};
pub use serializer::{QueryStringSerializer, SettingsSerializer};
pub use settings::{Filter, FilterExpression, LimitTo, OrderBy, SettingsPatch, ViewSettings};
