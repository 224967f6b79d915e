//! Project

use std::path::{Path, PathBuf};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use typed_builder::TypedBuilder;

use super::{id_type, parse_timestamp, version::VersionId};
use crate::{
    codec::{object, JsonModel},
    error::Result,
    query::{bool_as_str, Params},
};

id_type!(ProjectId);
id_type!(ProjectSlug);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub slug: ProjectSlug,
    pub title: String,
    pub description: String,
    pub body: String,
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_categories: Option<Vec<String>>,
    pub client_side: ProjectSide,
    pub server_side: ProjectSide,
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_status: Option<RequestedProjectStatus>,
    pub license: License,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_urls: Option<Vec<Donation>>,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monetization_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderator_message: Option<Value>,
    pub team: String,
    pub published: String,
    pub updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued: Option<String>,
    pub downloads: u64,
    pub followers: u64,
    pub versions: Vec<VersionId>,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loaders: Vec<String>,

    /// Token the project was fetched with. Later calls made through this
    /// project fall back to it.
    #[serde(skip)]
    pub auth: Option<String>,
}

impl JsonModel for Project {}

impl Project {
    /// `categories` followed by `additional_categories`, without duplicates.
    ///
    /// A name present in both lists appears once, at its position in
    /// `categories`, so this is a set union rather than a concatenation.
    pub fn all_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .chain(self.additional_categories.iter().flatten())
            .map(String::as_str)
            .unique()
            .collect_vec()
    }

    pub fn is_client_side(&self) -> bool {
        self.client_side == ProjectSide::Required
    }

    pub fn is_server_side(&self) -> bool {
        self.server_side == ProjectSide::Required
    }

    pub fn donations(&self) -> &[Donation] {
        self.donation_urls.as_deref().unwrap_or_default()
    }

    pub fn published_at(&self) -> Result<time::OffsetDateTime> {
        parse_timestamp(&self.published)
    }

    pub fn updated_at(&self) -> Result<time::OffsetDateTime> {
        parse_timestamp(&self.updated)
    }

    #[must_use]
    pub fn with_auth(mut self, auth: Option<String>) -> Self {
        self.auth = auth;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectSide {
    Required,
    Optional,
    Unsupported,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Approved,
    Archived,
    Rejected,
    Draft,
    Unlisted,
    Processing,
    Withheld,
    Scheduled,
    Private,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedProjectStatus {
    Approved,
    Archived,
    Unlisted,
    Private,
    Draft,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Mod,
    Modpack,
    ResourcePack,
    Shader,
    Plugin,
    DataPack,
}

impl ProjectType {
    pub fn iter() -> impl Iterator<Item = ProjectType> {
        use ProjectType::*;
        [Mod, Modpack, ResourcePack, Shader, Plugin, DataPack].into_iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mod => "mod",
            Self::Modpack => "modpack",
            Self::ResourcePack => "resourcepack",
            Self::Shader => "shader",
            Self::Plugin => "plugin",
            Self::DataPack => "datapack",
        }
    }

    pub fn as_facet(&self) -> String {
        format!("project_type:{}", self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown project type `{s}`"))
    }
}

/// License of a project. `id` is an SPDX identifier or `custom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl JsonModel for License {}

impl std::fmt::Display for License {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            f.write_str(&self.id)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A donation link. `id` is the platform key, `platform` its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub id: String,
    pub platform: String,
    pub url: String,
}

impl JsonModel for Donation {}

/// An image of a project's gallery.
///
/// `file_path` only exists locally: it is the source of an upload and is sent
/// as the request body, never as a JSON field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GalleryImage {
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<i64>,
}

impl GalleryImage {
    /// An image to upload from `file_path`.
    pub fn new(file_path: impl Into<PathBuf>, featured: bool) -> Self {
        Self {
            file_path: Some(file_path.into()),
            featured,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: i64) -> Self {
        self.ordering = Some(ordering);
        self
    }

    /// Extension of the local file, or of the hosted image when there is no
    /// local file.
    pub fn ext(&self) -> Option<String> {
        match (&self.file_path, &self.url) {
            (Some(path), _) => path.extension().map(|e| e.to_string_lossy().into_owned()),
            (None, Some(url)) => {
                let name = url.rsplit('/').next().unwrap_or(url);
                Path::new(name)
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
            }
            (None, None) => None,
        }
    }

    /// Query parameters of the upload endpoint.
    pub(crate) fn upload_params(&self) -> Params {
        Params::new()
            .add_optional_parameter("ext", self.ext())
            .add_parameter("featured", bool_as_str(self.featured))
            .add_optional_parameter("title", self.title.clone())
            .add_optional_parameter("description", self.description.clone())
            .add_optional_parameter("ordering", self.ordering.map(|o| o.to_string()))
    }
}

impl JsonModel for GalleryImage {
    fn to_json(&self) -> Result<Map<String, Value>> {
        let mut map = object(self)?;
        if let Some(ext) = self.ext() {
            map.insert("ext".to_owned(), Value::String(ext));
        }
        Ok(map)
    }
}

/// Changes to an existing gallery image, identified by its `url`.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct GalleryPatch {
    #[builder(setter(into))]
    pub url: String,
    #[builder(default, setter(strip_option))]
    pub featured: Option<bool>,
    #[builder(default, setter(strip_option, into))]
    pub title: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub description: Option<String>,
    #[builder(default, setter(strip_option))]
    pub ordering: Option<i64>,
}

impl GalleryPatch {
    /// No field besides the image url was given.
    pub fn is_empty(&self) -> bool {
        self.featured.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.ordering.is_none()
    }

    pub(crate) fn encode(&self) -> Params {
        Params::new()
            .add_parameter("url", self.url.clone())
            .add_optional_parameter("featured", self.featured.map(bool_as_str))
            .add_optional_parameter("title", self.title.clone())
            .add_optional_parameter("description", self.description.clone())
            .add_optional_parameter("ordering", self.ordering.map(|o| o.to_string()))
    }
}

/// Payload of the project creation endpoint.
///
/// The service reads the license as two flat keys here, while a fetched
/// project nests it in a `license` object. [`ProjectDraft::from_json`] accepts
/// both shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(try_from = "RawProjectDraft")]
pub struct ProjectDraft {
    #[builder(setter(into))]
    pub slug: String,
    #[builder(setter(into))]
    pub title: String,
    #[builder(setter(into))]
    pub description: String,
    #[builder(default)]
    pub categories: Vec<String>,
    pub client_side: ProjectSide,
    pub server_side: ProjectSide,
    #[builder(setter(into))]
    pub body: String,
    #[builder(setter(into))]
    pub license_id: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    #[builder(default)]
    pub project_type: ProjectType,
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_categories: Option<Vec<String>>,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_url: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_url: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_urls: Option<Vec<Donation>>,
}

impl ProjectDraft {
    /// A draft carrying the user-editable fields of `project`.
    pub fn from_project(project: &Project) -> Self {
        Self {
            slug: project.slug.to_string(),
            title: project.title.clone(),
            description: project.description.clone(),
            categories: project.categories.clone(),
            client_side: project.client_side,
            server_side: project.server_side,
            body: project.body.clone(),
            license_id: project.license.id.clone(),
            license_url: project.license.url.clone(),
            project_type: project.project_type,
            additional_categories: project.additional_categories.clone(),
            issues_url: project.issues_url.clone(),
            source_url: project.source_url.clone(),
            wiki_url: project.wiki_url.clone(),
            discord_url: project.discord_url.clone(),
            donation_urls: project.donation_urls.clone(),
        }
    }
}

impl JsonModel for ProjectDraft {
    fn to_json(&self) -> Result<Map<String, Value>> {
        let mut map = object(self)?;
        // Projects are always created as drafts without versions.
        map.insert("is_draft".to_owned(), Value::Bool(true));
        map.insert("initial_versions".to_owned(), Value::Array(Vec::new()));
        Ok(map)
    }
}

#[derive(Deserialize)]
struct LicenseRef {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct RawProjectDraft {
    slug: String,
    title: String,
    description: String,
    #[serde(default)]
    categories: Vec<String>,
    client_side: ProjectSide,
    server_side: ProjectSide,
    body: String,
    #[serde(default)]
    license: Option<LicenseRef>,
    #[serde(default)]
    license_id: Option<String>,
    #[serde(default)]
    license_url: Option<String>,
    project_type: ProjectType,
    #[serde(default)]
    additional_categories: Option<Vec<String>>,
    #[serde(default)]
    issues_url: Option<String>,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    wiki_url: Option<String>,
    #[serde(default)]
    discord_url: Option<String>,
    #[serde(default)]
    donation_urls: Option<Vec<Donation>>,
}

impl TryFrom<RawProjectDraft> for ProjectDraft {
    type Error = String;

    fn try_from(raw: RawProjectDraft) -> std::result::Result<Self, Self::Error> {
        let (license_id, license_url) = match (raw.license, raw.license_id) {
            (Some(license), _) => (license.id, license.url.or(raw.license_url)),
            (None, Some(id)) => (id, raw.license_url),
            (None, None) => return Err("missing field `license` or `license_id`".to_owned()),
        };

        Ok(Self {
            slug: raw.slug,
            title: raw.title,
            description: raw.description,
            categories: raw.categories,
            client_side: raw.client_side,
            server_side: raw.server_side,
            body: raw.body,
            license_id,
            license_url,
            project_type: raw.project_type,
            additional_categories: raw.additional_categories,
            issues_url: raw.issues_url,
            source_url: raw.source_url,
            wiki_url: raw.wiki_url,
            discord_url: raw.discord_url,
            donation_urls: raw.donation_urls,
        })
    }
}

/// Changes to an existing project. Unset fields are left untouched by the
/// service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct ProjectPatch {
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_side: Option<ProjectSide>,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_side: Option<ProjectSide>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_categories: Option<Vec<String>>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues_url: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_url: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_id: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_status: Option<RequestedProjectStatus>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderation_message: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderation_message_body: Option<String>,
}

impl JsonModel for ProjectPatch {}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
