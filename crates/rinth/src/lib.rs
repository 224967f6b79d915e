#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod auth;
pub mod client;
pub mod codec;
pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod models;
pub mod query;
pub mod relations;
pub mod search;

pub use client::Modrinth;
pub use codec::{coerce_list, strip_absent, Item, JsonModel};
pub use config::ClientConfig;
pub use download::DownloadedFile;
pub use error::{Error, Result};
pub use query::{Params, VersionFilters};
pub use search::{FacetGroup, Facets, Index, SearchQuery};
