//! Tags: the fixed vocabularies of the service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::project::ProjectType;
use crate::codec::JsonModel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub icon: String,
    pub name: String,
    pub project_type: ProjectType,
    pub header: String,
}

impl JsonModel for Category {}

/// The category tag listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories(Vec<Category>);

impl From<Vec<Category>> for Categories {
    fn from(value: Vec<Category>) -> Self {
        Self(value)
    }
}

impl Categories {
    pub fn all(&self) -> &[Category] {
        &self.0
    }

    pub fn for_project_type(
        &self,
        project_type: ProjectType,
    ) -> impl Iterator<Item = &Category> + '_ {
        self.0.iter().filter(move |c| c.project_type == project_type)
    }

    /// Names of the categories of `project_type`, keyed by header. Headers and
    /// names are both sorted.
    pub fn by_header(&self, project_type: ProjectType) -> BTreeMap<&str, Vec<&str>> {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for category in self.for_project_type(project_type) {
            grouped
                .entry(&category.header)
                .or_default()
                .push(&category.name);
        }

        grouped.values_mut().for_each(|names| names.sort_unstable());
        grouped
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loader {
    pub icon: String,
    pub name: String,
    pub supported_project_types: Vec<ProjectType>,
}

impl JsonModel for Loader {}

impl Loader {
    pub fn supports(&self, project_type: ProjectType) -> bool {
        self.supported_project_types.contains(&project_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVersion {
    pub version: String,
    pub version_type: String,
    pub date: String,
    pub major: bool,
}

impl JsonModel for GameVersion {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseTag {
    pub short: String,
    pub name: String,
}

impl JsonModel for LicenseTag {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationPlatform {
    pub short: String,
    pub name: String,
}

impl JsonModel for DonationPlatform {}
