//! Table API operations

pub mod query;
mod request;
mod resource;

pub use request::PreparedRequest;
pub use request::ResourceLocation;
pub use request::SendOptions;
pub(crate) use request::Exchange;
pub(crate) use request::Sender;
pub use resource::*;
