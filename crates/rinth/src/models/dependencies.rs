//! Project's dependencies

use serde::{Deserialize, Serialize};

use super::{project::Project, version::Version};
use crate::codec::JsonModel;

/// Every project and version the versions of a project depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependencies {
    pub projects: Vec<Project>,
    pub versions: Vec<Version>,
}

impl JsonModel for Dependencies {}
