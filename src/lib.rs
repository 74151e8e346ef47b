use std::error::Error as StdError;
use std::fmt;

mod config;
mod controller;
mod dom;
mod fake_page;
mod form;
mod page_context;
mod trace;
#[cfg(feature = "web")]
pub mod web;

pub use config::{ControllerConfig, Destinations, ElementIds};
pub use controller::{
    ClickAction, ClickOutcome, Handler, PageController, PageState, WiredHandler, reveal_indicator,
    submit_form,
};
pub use dom::{ClickEvent, PageDom};
pub use fake_page::{FakePage, FormSubmission, LocationNavigation, NodeId};
pub use form::{FormMethod, FormParameters, SyntheticForm};
pub use page_context::{PageContext, RouteRule, RouteTable};

pub type Result<T> = std::result::Result<T, Error>;

/// How an element was looked up when it could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Id,
    Class,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("#"),
            Self::Class => f.write_str("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    ElementNotFound { kind: Lookup, name: String },
    InvalidRoutePattern { pattern: String, message: String },
    MissingDestination(String),
    InvalidConfig(String),
    AlreadyWired,
    Dom(String),
}

impl Error {
    pub(crate) fn missing_id(id: &str) -> Self {
        Self::ElementNotFound {
            kind: Lookup::Id,
            name: id.to_string(),
        }
    }

    pub(crate) fn missing_class(class_name: &str) -> Self {
        Self::ElementNotFound {
            kind: Lookup::Class,
            name: class_name.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementNotFound { kind, name } => {
                write!(f, "element not found: {kind}{name}")
            }
            Self::InvalidRoutePattern { pattern, message } => {
                write!(f, "invalid route pattern {pattern:?}: {message}")
            }
            Self::MissingDestination(name) => write!(f, "missing destination: {name}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::AlreadyWired => f.write_str("page controller is already wired"),
            Self::Dom(msg) => write!(f, "dom error: {msg}"),
        }
    }
}

impl StdError for Error {}
