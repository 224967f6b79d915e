use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::{
    auth::{require_auth, resolve_auth},
    codec::JsonModel,
    config::ClientConfig,
    error::{classify, BadRequest, Error, Result},
    http::{Attachment, Body, HttpClient, Request, Response, ReqwestClient},
    models::{
        dependencies::Dependencies,
        project::{GalleryImage, GalleryPatch, Project, ProjectDraft, ProjectPatch},
        statistics::Statistics,
        tags::{Categories, DonationPlatform, GameVersion, LicenseTag, Loader},
        team::TeamMember,
        user::{Notification, User},
        version::{HashAlgorithm, Version, VersionDraft, VersionId},
    },
    query::{bool_as_str, json_list, Params, VersionFilters},
    search::{SearchQuery, SearchResults},
};

/// Entry point to the service.
///
/// Cheap to clone. Every method takes an optional token: when it is `None`
/// the token of the client configuration is used.
#[derive(Clone)]
pub struct Modrinth {
    http: Arc<dyn HttpClient>,
    token: Option<String>,
}

impl std::fmt::Debug for Modrinth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modrinth")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

fn owned(token: Option<&str>) -> Option<String> {
    resolve_auth(token, None).map(ToOwned::to_owned)
}

impl Modrinth {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_http(
            Arc::new(ReqwestClient::new(config)?),
            config.token.clone(),
        ))
    }

    /// A client over a custom transport.
    pub fn with_http(http: Arc<dyn HttpClient>, token: Option<String>) -> Self {
        Self { http, token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn auth<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        resolve_auth(explicit, self.token.as_deref())
    }

    async fn send(
        &self,
        request: Request,
        what: &str,
        bad_request: BadRequest,
    ) -> Result<Response> {
        debug!(method = request.method.as_str(), path = %request.path, "{what}");
        let response = self.http.request(request).await?;
        classify(response.status, &response.body, what, bad_request)?;
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: Request, what: &str) -> Result<T> {
        self.send(request, what, BadRequest::Invalid).await?.json()
    }

    // Projects

    pub async fn get_project(&self, id_or_slug: &str, auth: Option<&str>) -> Result<Project> {
        let request = Request::get(format!("project/{id_or_slug}"))
            .auth(self.auth(auth));
        let project: Project = self.fetch(request, "the requested project").await?;
        Ok(project.with_auth(owned(auth)))
    }

    /// `false` when the project does not exist or is hidden from the token.
    pub async fn project_exists(&self, id_or_slug: &str, auth: Option<&str>) -> Result<bool> {
        let request = Request::get(format!("project/{id_or_slug}/check"))
            .auth(self.auth(auth));
        match self.send(request, "the requested project", BadRequest::Invalid).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn get_projects<S: AsRef<str>>(
        &self,
        ids: &[S],
        auth: Option<&str>,
    ) -> Result<Vec<Project>> {
        let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        let request = Request::get("projects")
            .query(Params::new().add_parameter("ids", json_list(&ids)?))
            .auth(self.auth(auth));
        let projects: Vec<Project> = self.fetch(request, "the requested projects").await?;
        Ok(projects.into_iter().map(|p| p.with_auth(owned(auth))).collect())
    }

    pub async fn get_random_projects(&self, count: u32) -> Result<Vec<Project>> {
        let request = Request::get("projects_random")
            .query(Params::new().add_parameter("count", count.to_string()));
        self.fetch(request, "random projects").await
    }

    /// Creates `draft` as a draft project, with `icon` as its icon.
    pub async fn create_project(
        &self,
        draft: &ProjectDraft,
        icon: Option<Attachment>,
        auth: Option<&str>,
    ) -> Result<Project> {
        let token = require_auth(self.auth(auth), "create a project")?;

        let files = icon
            .map(|icon| Attachment {
                part: "icon".to_owned(),
                ..icon
            })
            .into_iter()
            .collect();
        let request = Request::post("project").auth(Some(token)).body(Body::Multipart {
            data: draft.to_json()?.into(),
            files,
        });

        let project: Project = self.fetch(request, "project creation").await?;
        Ok(project.with_auth(owned(auth)))
    }

    pub async fn modify_project(
        &self,
        id_or_slug: &str,
        patch: &ProjectPatch,
        auth: Option<&str>,
    ) -> Result<()> {
        if patch.is_empty() {
            return Err(Error::InvalidParam("no field to modify was given".to_owned()));
        }
        let token = require_auth(self.auth(auth), "modify a project")?;

        let request = Request::patch(format!("project/{id_or_slug}"))
            .auth(Some(token))
            .json(patch.to_json()?);
        self.send(request, "the requested project", BadRequest::Invalid).await?;
        Ok(())
    }

    pub async fn delete_project(&self, id_or_slug: &str, auth: Option<&str>) -> Result<()> {
        let token = require_auth(self.auth(auth), "delete a project")?;
        let request = Request::delete(format!("project/{id_or_slug}"))
            .auth(Some(token));
        self.send(request, "the requested project", BadRequest::Absent).await?;
        Ok(())
    }

    /// The icon format is taken from the extension of `icon.file_name`.
    pub async fn change_project_icon(
        &self,
        id_or_slug: &str,
        icon: Attachment,
        auth: Option<&str>,
    ) -> Result<()> {
        let ext = match icon.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext.to_owned(),
            _ => {
                return Err(Error::InvalidParam(format!(
                    "icon {} has no extension",
                    icon.file_name
                )))
            }
        };
        let token = require_auth(self.auth(auth), "change a project icon")?;

        let request = Request::patch(format!("project/{id_or_slug}/icon"))
            .query(Params::new().add_parameter("ext", ext))
            .auth(Some(token))
            .body(Body::Bytes(icon.bytes));
        self.send(request, "the requested project", BadRequest::Invalid).await?;
        Ok(())
    }

    pub async fn delete_project_icon(&self, id_or_slug: &str, auth: Option<&str>) -> Result<()> {
        let token = require_auth(self.auth(auth), "delete a project icon")?;
        let request = Request::delete(format!("project/{id_or_slug}/icon"))
            .auth(Some(token));
        self.send(request, "the requested project", BadRequest::Invalid).await?;
        Ok(())
    }

    /// Uploads the local file of `image`.
    pub async fn add_gallery_image(
        &self,
        id_or_slug: &str,
        image: &GalleryImage,
        auth: Option<&str>,
    ) -> Result<()> {
        let path = image
            .file_path
            .as_ref()
            .ok_or_else(|| Error::InvalidParam("gallery image has no local file".to_owned()))?;
        if image.ext().is_none() {
            return Err(Error::InvalidParam(format!(
                "gallery image {} has no extension",
                path.display()
            )));
        }
        let token = require_auth(self.auth(auth), "add a gallery image")?;

        let bytes = tokio::fs::read(path).await.map_err(|e| Error::io(path, e))?;
        let request = Request::post(format!("project/{id_or_slug}/gallery"))
            .query(image.upload_params())
            .auth(Some(token))
            .body(Body::Bytes(bytes));
        self.send(request, "the requested project", BadRequest::Invalid).await?;
        Ok(())
    }

    pub async fn modify_gallery_image(
        &self,
        id_or_slug: &str,
        patch: &GalleryPatch,
        auth: Option<&str>,
    ) -> Result<()> {
        if patch.is_empty() {
            return Err(Error::InvalidParam("no gallery field to modify was given".to_owned()));
        }
        let token = require_auth(self.auth(auth), "modify a gallery image")?;

        let request = Request::patch(format!("project/{id_or_slug}/gallery"))
            .query(patch.encode())
            .auth(Some(token));
        self.send(request, "the requested gallery image", BadRequest::Invalid).await?;
        Ok(())
    }

    pub async fn delete_gallery_image(
        &self,
        id_or_slug: &str,
        url: &str,
        auth: Option<&str>,
    ) -> Result<()> {
        if url.contains("cdn-raw") {
            return Err(Error::InvalidParam(
                "use cdn.modrinth.com instead of cdn-raw.modrinth.com".to_owned(),
            ));
        }
        let token = require_auth(self.auth(auth), "delete a gallery image")?;

        let request = Request::delete(format!("project/{id_or_slug}/gallery"))
            .query(Params::new().add_parameter("url", url))
            .auth(Some(token));
        self.send(request, "the requested gallery image", BadRequest::Invalid).await?;
        Ok(())
    }

    pub async fn project_dependencies(
        &self,
        id_or_slug: &str,
        auth: Option<&str>,
    ) -> Result<Dependencies> {
        let request = Request::get(format!("project/{id_or_slug}/dependencies"))
            .auth(self.auth(auth));
        self.fetch(request, "the requested project").await
    }

    pub async fn project_members(
        &self,
        id_or_slug: &str,
        auth: Option<&str>,
    ) -> Result<Vec<TeamMember>> {
        let request = Request::get(format!("project/{id_or_slug}/members"))
            .auth(self.auth(auth));
        self.fetch(request, "the requested project").await
    }

    /// Versions of a project, newest first.
    pub async fn project_versions(
        &self,
        id_or_slug: &str,
        filters: &VersionFilters,
        auth: Option<&str>,
    ) -> Result<Vec<Version>> {
        let request = Request::get(format!("project/{id_or_slug}/version"))
            .query(filters.encode()?)
            .auth(self.auth(auth));
        let versions: Vec<Version> = self.fetch(request, "the requested project").await?;
        Ok(versions.into_iter().filter(|v| filters.accepts(v)).collect())
    }

    pub async fn follow_project(&self, id_or_slug: &str, auth: Option<&str>) -> Result<()> {
        let token = require_auth(self.auth(auth), "follow a project")?;
        let request = Request::post(format!("project/{id_or_slug}/follow"))
            .auth(Some(token));
        self.send(request, "the requested project", BadRequest::Absent).await?;
        Ok(())
    }

    pub async fn unfollow_project(&self, id_or_slug: &str, auth: Option<&str>) -> Result<()> {
        let token = require_auth(self.auth(auth), "unfollow a project")?;
        let request = Request::delete(format!("project/{id_or_slug}/follow"))
            .auth(Some(token));
        self.send(request, "the requested project", BadRequest::Absent).await?;
        Ok(())
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        let request = Request::get("search").query(query.encode()?);
        self.fetch(request, "search results").await
    }

    // Versions

    pub async fn get_version(&self, id: &VersionId, auth: Option<&str>) -> Result<Version> {
        let request = Request::get(format!("version/{id}")).auth(self.auth(auth));
        self.fetch(request, "the requested version").await
    }

    pub async fn get_versions(
        &self,
        ids: &[VersionId],
        auth: Option<&str>,
    ) -> Result<Vec<Version>> {
        let request = Request::get("versions")
            .query(Params::new().add_parameter("ids", json_list(ids)?))
            .auth(self.auth(auth));
        self.fetch(request, "the requested versions").await
    }

    /// Uploads a new version with `files`.
    ///
    /// When `draft.file_parts` is empty it is filled with the part names of
    /// `files`.
    pub async fn create_version(
        &self,
        draft: &VersionDraft,
        files: Vec<Attachment>,
        auth: Option<&str>,
    ) -> Result<Version> {
        if draft.project_id.is_empty() {
            return Err(Error::InvalidParam("a version needs a project id".to_owned()));
        }
        if files.is_empty() {
            return Err(Error::InvalidParam("a version needs at least one file".to_owned()));
        }
        let token = require_auth(self.auth(auth), "create a version")?;

        let mut draft = draft.clone();
        if draft.file_parts.is_empty() {
            draft.file_parts = files.iter().map(|f| f.part.clone()).collect();
        }

        let request = Request::post("version").auth(Some(token)).body(Body::Multipart {
            data: draft.to_json()?.into(),
            files,
        });
        self.fetch(request, "version creation").await
    }

    pub async fn version_from_hash(
        &self,
        hash: &str,
        algorithm: HashAlgorithm,
        auth: Option<&str>,
    ) -> Result<Version> {
        let request = Request::get(format!("version_file/{hash}"))
            .query(Params::new().add_parameter("algorithm", algorithm.as_str()))
            .auth(self.auth(auth));
        self.fetch(request, "the requested version file").await
    }

    /// Every version containing a file with this hash.
    pub async fn versions_from_hash(
        &self,
        hash: &str,
        algorithm: HashAlgorithm,
        auth: Option<&str>,
    ) -> Result<Vec<Version>> {
        let request = Request::get(format!("version_file/{hash}"))
            .query(
                Params::new()
                    .add_parameter("algorithm", algorithm.as_str())
                    .add_parameter("multiple", bool_as_str(true)),
            )
            .auth(self.auth(auth));
        let versions: OneOrMany<Version> = self.fetch(request, "the requested version file").await?;
        Ok(versions.into())
    }

    /// `version_id` picks the version when several share the file.
    pub async fn delete_file_from_hash(
        &self,
        hash: &str,
        algorithm: HashAlgorithm,
        version_id: Option<&VersionId>,
        auth: Option<&str>,
    ) -> Result<()> {
        let token = require_auth(self.auth(auth), "delete a file")?;
        let request = Request::delete(format!("version_file/{hash}"))
            .query(
                Params::new()
                    .add_parameter("algorithm", algorithm.as_str())
                    .add_optional_parameter("version_id", version_id.map(ToString::to_string)),
            )
            .auth(Some(token));
        self.send(request, "the requested version file", BadRequest::Invalid).await?;
        Ok(())
    }

    // Users

    pub async fn get_user(&self, id_or_username: &str, auth: Option<&str>) -> Result<User> {
        let request = Request::get(format!("user/{id_or_username}"))
            .auth(self.auth(auth));
        self.fetch(request, "the requested user").await
    }

    pub async fn get_users<S: AsRef<str>>(
        &self,
        ids: &[S],
        auth: Option<&str>,
    ) -> Result<Vec<User>> {
        let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        let request = Request::get("users")
            .query(Params::new().add_parameter("ids", json_list(&ids)?))
            .auth(self.auth(auth));
        self.fetch(request, "the requested users").await
    }

    /// The user owning the token. The token stays attached to it.
    pub async fn user_from_auth(&self, auth: Option<&str>) -> Result<User> {
        let token = require_auth(self.auth(auth), "get the current user")?;
        let request = Request::get("user").auth(Some(token));
        let user: User = self.fetch(request, "the current user").await?;
        Ok(user.with_auth(Some(token.to_owned())))
    }

    pub async fn user_projects(
        &self,
        id_or_username: &str,
        auth: Option<&str>,
    ) -> Result<Vec<Project>> {
        let request = Request::get(format!("user/{id_or_username}/projects"))
            .auth(self.auth(auth));
        let projects: Vec<Project> = self.fetch(request, "the requested user").await?;
        Ok(projects.into_iter().map(|p| p.with_auth(owned(auth))).collect())
    }

    pub async fn followed_projects(
        &self,
        id_or_username: &str,
        auth: Option<&str>,
    ) -> Result<Vec<Project>> {
        let token = require_auth(self.auth(auth), "see followed projects")?;
        let request = Request::get(format!("user/{id_or_username}/follows"))
            .auth(Some(token));
        let projects: Vec<Project> = self.fetch(request, "the requested user").await?;
        Ok(projects.into_iter().map(|p| p.with_auth(owned(auth))).collect())
    }

    pub async fn notifications(
        &self,
        id_or_username: &str,
        auth: Option<&str>,
    ) -> Result<Vec<Notification>> {
        let token = require_auth(self.auth(auth), "see notifications")?;
        let request = Request::get(format!("user/{id_or_username}/notifications"))
            .auth(Some(token));
        self.fetch(request, "the requested user").await
    }

    // Tags

    pub async fn categories(&self) -> Result<Categories> {
        self.fetch(Request::get("tag/category"), "categories").await
    }

    pub async fn loaders(&self) -> Result<Vec<Loader>> {
        self.fetch(Request::get("tag/loader"), "loaders").await
    }

    pub async fn game_versions(&self) -> Result<Vec<GameVersion>> {
        self.fetch(Request::get("tag/game_version"), "game versions").await
    }

    pub async fn licenses(&self) -> Result<Vec<LicenseTag>> {
        self.fetch(Request::get("tag/license"), "licenses").await
    }

    pub async fn donation_platforms(&self) -> Result<Vec<DonationPlatform>> {
        self.fetch(Request::get("tag/donation_platform"), "donation platforms").await
    }

    pub async fn report_types(&self) -> Result<Vec<String>> {
        self.fetch(Request::get("tag/report_type"), "report types").await
    }

    // Misc

    pub async fn statistics(&self) -> Result<Statistics> {
        self.fetch(Request::get("statistics"), "statistics").await
    }

    /// Raw bytes behind an absolute url, such as a version file on the CDN.
    pub async fn download_file(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(Request::get(url), url, BadRequest::Invalid).await?;
        Ok(response.body)
    }
}
