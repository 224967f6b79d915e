//! Search for projects

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    codec::JsonModel,
    error::Result,
    models::project::{ProjectId, ProjectSide, ProjectSlug, ProjectType},
    query::{json_list, Params},
};

pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub hits: Vec<SearchResult>,
    pub offset: u32,
    pub limit: u32,
    pub total_hits: u64,
}

/// A search hit. It is a projection built by the search index and carries
/// fewer fields than a [`Project`](crate::models::project::Project).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub project_id: ProjectId,
    pub slug: ProjectSlug,
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub display_categories: Vec<String>,
    pub client_side: ProjectSide,
    pub server_side: ProjectSide,
    pub project_type: ProjectType,
    pub downloads: u64,
    pub follows: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monetization_status: Option<String>,
    pub author: String,
    #[serde(default)]
    pub versions: Vec<String>,
    pub date_created: String,
    pub date_modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    pub license: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_gallery: Option<String>,
}

impl JsonModel for SearchResult {}

/// Parameters of the search endpoint.
///
/// Every field has a default, and [`SearchQuery::encode`] only emits the ones
/// that differ from it: an omitted parameter means "use the default" to the
/// service.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct SearchQuery {
    #[builder(default, setter(into))]
    pub query: String,
    #[builder(default, setter(into))]
    pub facets: Facets,
    #[builder(default)]
    pub index: Index,
    #[builder(default)]
    pub offset: u32,

    /// The service accepts at most 100.
    #[builder(default = DEFAULT_LIMIT)]
    pub limit: u32,
    #[builder(default, setter(into))]
    pub filters: Vec<String>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SearchQuery {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn encode(&self) -> Result<Params> {
        let facets = (!self.facets.is_empty())
            .then(|| self.facets.build())
            .transpose()?;
        let filters = (!self.filters.is_empty())
            .then(|| json_list(&self.filters))
            .transpose()?;
        let index = (self.index != Index::default()).then_some(self.index.as_str());
        let limit = (self.limit != DEFAULT_LIMIT).then(|| self.limit.to_string());

        Ok(Params::new()
            .add_optional_parameter("query", (!self.query.is_empty()).then_some(&*self.query))
            .add_optional_parameter("facets", facets)
            .add_optional_parameter("index", index)
            .add_optional_parameter("offset", (self.offset != 0).then(|| self.offset.to_string()))
            .add_optional_parameter("limit", limit)
            .add_optional_parameter("filters", filters))
    }
}

/// Facet expression: a list of [`FacetGroup`]s.
///
/// The groups and the strings inside them are sent verbatim; the search index
/// decides how they combine.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Facets(Vec<FacetGroup>);

impl Facets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_project_type(project_type: ProjectType) -> Self {
        let facets = Self::new().group(FacetGroup::new().project_type(project_type));
        match FacetGroup::from_project_type(project_type) {
            Some(loaders) => facets.group(loaders),
            None => facets,
        }
    }

    pub fn group(mut self, group: FacetGroup) -> Self {
        self.0.push(group);
        self
    }

    pub fn add_group(&mut self, group: FacetGroup) -> &mut Self {
        self.0.push(group);
        self
    }

    pub fn groups(&self) -> &[FacetGroup] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn build(&self) -> Result<String> {
        json_list(&self.0.iter().map(|g| &g.0).collect::<Vec<_>>())
    }
}

impl From<Vec<Vec<String>>> for Facets {
    fn from(value: Vec<Vec<String>>) -> Self {
        Self(value.into_iter().map(FacetGroup).collect())
    }
}

impl<const N: usize, const M: usize> From<[[&str; M]; N]> for Facets {
    fn from(value: [[&str; M]; N]) -> Self {
        Self(
            value
                .into_iter()
                .map(|group| FacetGroup(group.into_iter().map(String::from).collect()))
                .collect(),
        )
    }
}

/// One group of facet strings such as `categories:fabric`.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct FacetGroup(Vec<String>);

impl FacetGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strings must already be in the `key:value` form.
    ///
    /// Use [`Self::format_category`] and [`Self::format_version`] to format your data.
    pub fn from_vec(vec: Vec<String>) -> Self {
        Self(vec)
    }

    pub fn from_project_type(project_type: ProjectType) -> Option<Self> {
        match project_type {
            ProjectType::Mod => Some(
                FacetGroup::new()
                    .category("forge")
                    .category("fabric")
                    .category("quilt")
                    .category("liteloader")
                    .category("modloader")
                    .category("rift")
                    .category("neoforge"),
            ),
            ProjectType::Plugin => Some(
                FacetGroup::new()
                    .category("bukkit")
                    .category("spigot")
                    .category("paper")
                    .category("purpur")
                    .category("sponge")
                    .category("bungeecord")
                    .category("waterfall")
                    .category("velocity")
                    .category("folia"),
            ),
            ProjectType::DataPack => Some(FacetGroup::new().category("datapack")),
            _ => None,
        }
    }

    pub fn format_category(category: impl Into<String>) -> String {
        format!("categories:{}", category.into())
    }

    pub fn format_version(version: impl Into<String>) -> String {
        format!("versions:{}", version.into())
    }

    pub fn project_type(mut self, project_type: ProjectType) -> Self {
        self.0.push(project_type.as_facet());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.0.push(Self::format_category(category));
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.0.push(Self::format_version(version));
        self
    }

    pub fn client_side(mut self) -> Self {
        self.0.push("client_side".to_owned());
        self
    }

    pub fn server_side(mut self) -> Self {
        self.0.push("server_side".to_owned());
        self
    }

    pub fn open_source(mut self) -> Self {
        self.0.push("open_source".to_owned());
        self
    }

    pub fn items(&self) -> &[String] {
        &self.0
    }
}

/// Sort order of the search results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Index {
    #[default]
    Relevance,
    Downloads,
    Follows,
    Newest,
    Updated,
}

impl From<Index> for String {
    fn from(value: Index) -> Self {
        value.as_str().to_owned()
    }
}

impl Index {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Downloads => "downloads",
            Self::Follows => "follows",
            Self::Newest => "newest",
            Self::Updated => "updated",
        }
    }
}

impl std::str::FromStr for Index {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(Self::Relevance),
            "downloads" => Ok(Self::Downloads),
            "follows" => Ok(Self::Follows),
            "newest" => Ok(Self::Newest),
            "updated" => Ok(Self::Updated),
            other => Err(format!("unknown search index `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_encode_nothing() {
        assert!(SearchQuery::default().encode().unwrap().is_empty());
    }

    #[test]
    fn only_index_differs() {
        let params = SearchQuery::builder()
            .index(Index::Downloads)
            .build()
            .encode()
            .unwrap();
        assert_eq!(1, params.len());
        assert_eq!(Some("downloads"), params.get("index"));
    }

    #[test]
    fn facets_are_json_arrays() {
        let params = SearchQuery::builder()
            .facets([["categories:fabric"]])
            .build()
            .encode()
            .unwrap();
        assert_eq!(1, params.len());
        assert_eq!(Some(r#"[["categories:fabric"]]"#), params.get("facets"));
    }

    #[test]
    fn explicit_defaults_are_still_omitted() {
        let params = SearchQuery::builder()
            .query("")
            .index(Index::Relevance)
            .offset(0)
            .limit(10)
            .filters(Vec::<String>::new())
            .build()
            .encode()
            .unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn every_parameter() {
        let params = SearchQuery::builder()
            .query("sodium")
            .facets(Facets::new().group(FacetGroup::new().category("fabric").version("1.20.1")))
            .index(Index::Newest)
            .offset(20)
            .limit(50)
            .filters(vec!["downloads > 100".to_owned()])
            .build()
            .encode()
            .unwrap();

        assert_eq!(
            vec![
                ("query".to_owned(), "sodium".to_owned()),
                (
                    "facets".to_owned(),
                    r#"[["categories:fabric","versions:1.20.1"]]"#.to_owned()
                ),
                ("index".to_owned(), "newest".to_owned()),
                ("offset".to_owned(), "20".to_owned()),
                ("limit".to_owned(), "50".to_owned()),
                ("filters".to_owned(), r#"["downloads > 100"]"#.to_owned()),
            ],
            params.pairs().to_vec()
        );
    }

    #[test]
    fn project_type_facets() {
        let facets = Facets::from_project_type(ProjectType::DataPack);
        assert_eq!(
            r#"[["project_type:datapack"],["categories:datapack"]]"#,
            facets.build().unwrap()
        );

        let facets = Facets::from_project_type(ProjectType::Shader);
        assert_eq!(1, facets.groups().len());
    }

    #[test]
    fn search_result_round_trip() {
        let raw = json!({
            "project_id": "AANobbMI",
            "slug": "sodium",
            "title": "Sodium",
            "description": "Rendering engine",
            "categories": ["fabric", "optimization"],
            "display_categories": ["fabric"],
            "client_side": "required",
            "server_side": "unsupported",
            "project_type": "mod",
            "downloads": 100,
            "follows": 5,
            "icon_url": "https://cdn.modrinth.com/icon.png",
            "color": null,
            "author": "jellysquid3",
            "versions": ["1.20.1"],
            "date_created": "2021-01-03T07:55:56.000000Z",
            "date_modified": "2023-08-01T00:00:00.000000Z",
            "latest_version": "1.20.1",
            "license": "LGPL-3.0-only",
            "gallery": []
        });

        let hit = SearchResult::from_json(raw).unwrap();
        assert_eq!(None, hit.color);

        let map = hit.to_json().unwrap();
        assert!(!map.contains_key("color"));
        assert_eq!(hit, SearchResult::from_json(map.into()).unwrap());
    }
}
