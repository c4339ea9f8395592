//! Query encoding.
//!
//! Turns what a caller asks for into the flat parameter map sent on the
//! wire.
//!
//! - [`QuerySpec`] - structured [`Filter`], raw encoded query, or mapping
//! - [`RequestOptions`] - projection, sorting, limit, offset, page size
//! - [`QueryEncoder`] - composes both into [`ComposedParams`]

mod encoded;
mod encoder;
mod filter;
mod options;
mod order;
mod params;
mod spec;

pub use encoded::filter_to_query;
pub use encoded::order_to_query;
pub use encoder::QueryEncoder;
pub use filter::Condition;
pub use filter::Filter;
pub use filter::Operand;
pub use filter::Operator;
pub use options::RequestOptions;
pub use order::Direction;
pub use order::OrderBy;
pub use params::*;
pub use spec::QuerySpec;
