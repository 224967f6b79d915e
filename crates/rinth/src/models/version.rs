//! Version

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::{id_type, parse_timestamp, project::ProjectId};
use crate::{codec::JsonModel, error::Result};

id_type!(VersionId);

pub type ProjectVersions = Vec<Version>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub name: String,
    pub version_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    pub game_versions: Vec<String>,
    pub version_type: VersionType,
    pub loaders: Vec<String>,
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VersionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_status: Option<VersionStatus>,
    pub id: VersionId,
    pub project_id: ProjectId,
    pub author_id: String,
    pub date_published: String,
    pub downloads: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog_url: Option<String>,
    pub files: Vec<File>,
}

impl JsonModel for Version {}

impl Version {
    /// Files flagged as primary. A version with no flagged file yields its
    /// first file instead.
    pub fn primary_files(&self) -> Vec<&File> {
        let primary: Vec<&File> = self.files.iter().filter(|f| f.primary).collect();
        if primary.is_empty() {
            self.files.iter().take(1).collect()
        } else {
            primary
        }
    }

    pub fn required_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(|d| d.is_required())
    }

    pub fn published_at(&self) -> Result<time::OffsetDateTime> {
        parse_timestamp(&self.date_published)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    #[default]
    Release,
    Beta,
    Alpha,
}

impl VersionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Beta => "beta",
            Self::Alpha => "alpha",
        }
    }
}

impl std::str::FromStr for VersionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "release" => Ok(Self::Release),
            "beta" => Ok(Self::Beta),
            "alpha" => Ok(Self::Alpha),
            other => Err(format!("unknown version type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Listed,
    Archived,
    Draft,
    Unlisted,
    Scheduled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Required,
    Optional,
    Incompatible,
    Embedded,
}

/// What a dependency points at.
///
/// A pinned version always wins over a project: when both ids are present
/// the project id is kept only as information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyTarget {
    Version {
        version_id: VersionId,
        project_id: Option<ProjectId>,
    },
    Project {
        project_id: ProjectId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDependency", into = "RawDependency")]
pub struct Dependency {
    pub target: DependencyTarget,
    pub dependency_type: DependencyType,
    pub file_name: Option<String>,
}

impl JsonModel for Dependency {}

impl Dependency {
    pub fn on_version(version_id: impl Into<VersionId>, dependency_type: DependencyType) -> Self {
        Self {
            target: DependencyTarget::Version {
                version_id: version_id.into(),
                project_id: None,
            },
            dependency_type,
            file_name: None,
        }
    }

    pub fn on_project(project_id: impl Into<ProjectId>, dependency_type: DependencyType) -> Self {
        Self {
            target: DependencyTarget::Project {
                project_id: project_id.into(),
            },
            dependency_type,
            file_name: None,
        }
    }

    pub fn version_id(&self) -> Option<&VersionId> {
        match &self.target {
            DependencyTarget::Version { version_id, .. } => Some(version_id),
            DependencyTarget::Project { .. } => None,
        }
    }

    pub fn project_id(&self) -> Option<&ProjectId> {
        match &self.target {
            DependencyTarget::Version { project_id, .. } => project_id.as_ref(),
            DependencyTarget::Project { project_id } => Some(project_id),
        }
    }

    pub fn is_required(&self) -> bool {
        self.dependency_type == DependencyType::Required
    }

    pub fn is_optional(&self) -> bool {
        self.dependency_type == DependencyType::Optional
    }

    pub fn is_incompatible(&self) -> bool {
        self.dependency_type == DependencyType::Incompatible
    }

    pub fn is_embedded(&self) -> bool {
        self.dependency_type == DependencyType::Embedded
    }
}

#[derive(Serialize, Deserialize)]
struct RawDependency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version_id: Option<VersionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project_id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    dependency_type: DependencyType,
}

impl TryFrom<RawDependency> for Dependency {
    type Error = String;

    fn try_from(raw: RawDependency) -> std::result::Result<Self, Self::Error> {
        let target = match (raw.version_id, raw.project_id) {
            (Some(version_id), project_id) => DependencyTarget::Version {
                version_id,
                project_id,
            },
            (None, Some(project_id)) => DependencyTarget::Project { project_id },
            (None, None) => {
                return Err("a dependency needs a `version_id` or a `project_id`".to_owned())
            }
        };

        Ok(Self {
            target,
            dependency_type: raw.dependency_type,
            file_name: raw.file_name,
        })
    }
}

impl From<Dependency> for RawDependency {
    fn from(dependency: Dependency) -> Self {
        let (version_id, project_id) = match dependency.target {
            DependencyTarget::Version {
                version_id,
                project_id,
            } => (Some(version_id), project_id),
            DependencyTarget::Project { project_id } => (None, Some(project_id)),
        };

        Self {
            version_id,
            project_id,
            file_name: dependency.file_name,
            dependency_type: dependency.dependency_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha1,
    Sha512,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha512 => "sha512",
        }
    }
}

/// A downloadable file of a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub hashes: BTreeMap<String, String>,
    pub url: String,
    #[serde(rename = "filename")]
    pub name: String,
    pub primary: bool,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl JsonModel for File {}

impl File {
    /// Text after the last `.` of the name, or the whole name when it has no
    /// dot.
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn hash(&self, algorithm: HashAlgorithm) -> Option<&str> {
        self.hashes.get(algorithm.as_str()).map(String::as_str)
    }

    pub fn sha1(&self) -> Option<&str> {
        self.hash(HashAlgorithm::Sha1)
    }

    /// Only resource pack files carry a `file_type`.
    pub fn is_resource_pack(&self) -> bool {
        self.file_type.is_some()
    }
}

/// Metadata of a new version. The files themselves travel as multipart parts
/// next to it, named by `file_parts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct VersionDraft {
    /// Left empty when the draft goes through `Project::create_version`.
    #[builder(default, setter(into))]
    pub project_id: ProjectId,
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into))]
    pub version_number: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    pub game_versions: Vec<String>,
    #[builder(default)]
    pub version_type: VersionType,
    pub loaders: Vec<String>,
    #[builder(default)]
    pub featured: bool,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VersionStatus>,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_status: Option<VersionStatus>,
    #[builder(default)]
    #[serde(default)]
    pub file_parts: Vec<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_file: Option<String>,
}

impl JsonModel for VersionDraft {}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn version_json() -> Value {
        json!({
            "name": "Sodium 0.5.0",
            "version_number": "mc1.20.1-0.5.0",
            "changelog": null,
            "dependencies": [
                {
                    "version_id": "v-dep",
                    "project_id": "p-dep",
                    "file_name": null,
                    "dependency_type": "required"
                },
                {
                    "version_id": null,
                    "project_id": "p-opt",
                    "file_name": null,
                    "dependency_type": "optional"
                }
            ],
            "game_versions": ["1.20.1"],
            "version_type": "release",
            "loaders": ["fabric"],
            "featured": true,
            "status": "listed",
            "requested_status": null,
            "id": "v1",
            "project_id": "AANobbMI",
            "author_id": "u1",
            "date_published": "2023-06-01T00:00:00.000000Z",
            "downloads": 42,
            "changelog_url": null,
            "files": [{
                "hashes": { "sha1": "abc", "sha512": "def" },
                "url": "https://cdn.modrinth.com/data/AANobbMI/versions/v1/sodium-0.5.0.jar",
                "filename": "sodium-0.5.0.jar",
                "primary": true,
                "size": 1024,
                "file_type": null
            }]
        })
    }

    #[test]
    fn round_trip() {
        let version = Version::from_json(version_json()).unwrap();
        assert_eq!(None, version.changelog);
        assert_eq!(Some(VersionStatus::Listed), version.status);

        let map = version.to_json().unwrap();
        assert!(!map.contains_key("changelog"));
        assert!(!map.contains_key("requested_status"));
        assert_eq!(version, Version::from_json(map.into()).unwrap());
    }

    #[test]
    fn dependency_targets() {
        let version = Version::from_json(version_json()).unwrap();

        let pinned = &version.dependencies[0];
        assert_eq!(Some(&VersionId::from("v-dep")), pinned.version_id());
        assert_eq!(Some(&ProjectId::from("p-dep")), pinned.project_id());
        assert!(pinned.is_required());

        let floating = &version.dependencies[1];
        assert_eq!(None, floating.version_id());
        assert_eq!(Some(&ProjectId::from("p-opt")), floating.project_id());
        assert!(floating.is_optional());

        assert_eq!(1, version.required_dependencies().count());
    }

    #[test]
    fn dependency_without_target() {
        let raw = json!({ "dependency_type": "required" });
        assert!(matches!(
            Dependency::from_json(raw),
            Err(crate::Error::Decode { .. })
        ));
    }

    #[test]
    fn dependency_serializes_flat() {
        let dependency = Dependency::on_project("p1", DependencyType::Embedded);
        let map = dependency.to_json().unwrap();
        assert_eq!(Some(&json!("p1")), map.get("project_id"));
        assert_eq!(Some(&json!("embedded")), map.get("dependency_type"));
        assert!(!map.contains_key("version_id"));
        assert!(!map.contains_key("target"));
    }

    #[test]
    fn file_extension() {
        let mut file = Version::from_json(version_json()).unwrap().files.remove(0);
        assert_eq!("jar", file.extension());
        assert_eq!(Some("abc"), file.sha1());
        assert_eq!(Some("def"), file.hash(HashAlgorithm::Sha512));

        file.name = "mod-1.2.jar".to_owned();
        assert_eq!("jar", file.extension());

        file.name = "README".to_owned();
        assert_eq!("README", file.extension());
    }

    #[test]
    fn primary_files_fallback() {
        let mut version = Version::from_json(version_json()).unwrap();
        assert_eq!(1, version.primary_files().len());

        version.files[0].primary = false;
        assert_eq!("sodium-0.5.0.jar", version.primary_files()[0].name);

        version.files.clear();
        assert!(version.primary_files().is_empty());
    }

    #[test]
    fn draft_defaults() {
        let draft = VersionDraft::builder()
            .project_id("AANobbMI")
            .name("1.0")
            .version_number("1.0.0")
            .game_versions(vec!["1.20.1".to_owned()])
            .loaders(vec!["fabric".to_owned()])
            .build();

        let map = draft.to_json().unwrap();
        assert_eq!(Some(&json!("release")), map.get("version_type"));
        assert_eq!(Some(&json!(false)), map.get("featured"));
        assert_eq!(Some(&json!([])), map.get("file_parts"));
        assert!(!map.contains_key("changelog"));
        assert_eq!(draft, VersionDraft::from_json(map.into()).unwrap());
    }
}
