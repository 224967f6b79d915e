use serde::{Deserialize, Serialize};

use crate::codec::JsonModel;

/// Service-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub projects: u64,
    pub versions: u64,
    pub files: u64,
    pub authors: u64,
}

impl JsonModel for Statistics {}
