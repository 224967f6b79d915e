//! Query-string parameters.

use serde::Serialize;
use typed_builder::TypedBuilder;

use crate::{
    error::{Error, Result},
    models::version::{Version, VersionType},
};

/// Ordered list of `name=value` pairs handed to the transport as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    data: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parameter(mut self, name: impl Into<String>, param: impl Into<String>) -> Self {
        self.data.push((name.into(), param.into()));
        self
    }

    pub fn add_optional_parameter(
        self,
        name: impl Into<String>,
        param: Option<impl Into<String>>,
    ) -> Self {
        match param {
            Some(param) => self.add_parameter(name, param),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.data
    }
}

/// JSON-encodes a list into a single parameter value, e.g. `["a","b"]`.
pub(crate) fn json_list<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::InvalidParam(e.to_string()))
}

/// Do not ask.
///
/// The service only understands the lowercase literals.
pub(crate) fn bool_as_str(val: bool) -> &'static str {
    ["false", "true"][val as usize]
}

/// Filters of the project version listing.
///
/// `loaders`, `game_versions` and `featured` are sent to the server. The
/// server has no version type filter, so `version_types` is applied to the
/// returned list instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
pub struct VersionFilters {
    #[builder(default, setter(strip_option))]
    pub loaders: Option<Vec<String>>,
    #[builder(default, setter(strip_option))]
    pub game_versions: Option<Vec<String>>,
    #[builder(default, setter(strip_option))]
    pub featured: Option<bool>,
    #[builder(default)]
    pub version_types: Vec<VersionType>,
}

impl VersionFilters {
    pub fn encode(&self) -> Result<Params> {
        let loaders = self.loaders.as_deref().map(json_list).transpose()?;
        let game_versions = self.game_versions.as_deref().map(json_list).transpose()?;

        Ok(Params::new()
            .add_optional_parameter("loaders", loaders)
            .add_optional_parameter("game_versions", game_versions)
            .add_optional_parameter("featured", self.featured.map(bool_as_str)))
    }

    /// Whether `version` passes the client-side part of the filter.
    pub fn accepts(&self, version: &Version) -> bool {
        self.version_types.is_empty() || self.version_types.contains(&version.version_type)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn bool_as_str_test() {
        assert_eq!("true", bool_as_str(true));
        assert_eq!("false", bool_as_str(false));
    }

    #[test]
    fn optional_parameters_are_skipped() {
        let params = Params::new()
            .add_optional_parameter("a", None::<String>)
            .add_optional_parameter("b", Some("1"))
            .add_parameter("c", "2");

        assert_eq!(2, params.len());
        assert_eq!(None, params.get("a"));
        assert_eq!(Some("1"), params.get("b"));
        assert_eq!(Some("2"), params.get("c"));
    }

    #[test]
    fn json_list_is_compact() {
        assert_eq!(r#"["fabric","quilt"]"#, json_list(&["fabric", "quilt"]).unwrap());
        assert_eq!("[]", json_list(&Vec::<String>::new()).unwrap());
    }

    #[test]
    fn unencodable_list_is_an_invalid_param() {
        let keyed_by_pair = BTreeMap::from([((1u8, 2u8), "x")]);
        assert!(matches!(
            json_list(&[keyed_by_pair]),
            Err(Error::InvalidParam(_))
        ));
    }

    #[test]
    fn default_version_filters_encode_nothing() {
        assert!(VersionFilters::default().encode().unwrap().is_empty());
    }

    #[test]
    fn version_filters_encoding() {
        let filters = VersionFilters::builder()
            .loaders(vec!["fabric".to_owned()])
            .game_versions(vec!["1.19.2".to_owned(), "1.20.1".to_owned()])
            .featured(false)
            .version_types(vec![VersionType::Release])
            .build();

        let params = filters.encode().unwrap();

        assert_eq!(3, params.len());
        assert_eq!(Some(r#"["fabric"]"#), params.get("loaders"));
        assert_eq!(Some(r#"["1.19.2","1.20.1"]"#), params.get("game_versions"));
        assert_eq!(Some("false"), params.get("featured"));
    }
}
