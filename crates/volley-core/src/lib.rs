pub mod config;
pub mod logging;

pub mod dispatcher;
pub mod error;
pub mod outcome;
pub mod progress;
pub mod report;
pub mod request;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use error::{PlanError, RequestError, TemplateError};
pub use outcome::{FailureKind, Outcome, Response};
pub use progress::ProgressStats;
pub use request::{Method, RequestTemplate};
pub use transport::{CurlTransport, Transport, TransportOptions};
