//! Navigation between entities.
//!
//! Entities are plain snapshots, so following a relation always takes the
//! client explicitly. Calls made through a project or user fall back to the
//! token that entity carries.

use tracing::{instrument, warn};

use crate::{
    auth::resolve_auth,
    client::Modrinth,
    error::{Error, Result},
    http::Attachment,
    models::{
        dependencies::Dependencies,
        project::{GalleryImage, GalleryPatch, Project, ProjectDraft, ProjectPatch},
        team::{Team, TeamMember},
        user::{Notification, User},
        version::{Dependency, DependencyTarget, Version, VersionDraft},
    },
    query::VersionFilters,
};

impl Project {
    fn token<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        resolve_auth(explicit, self.auth.as_deref())
    }

    /// Versions matching `filters`, newest first.
    #[instrument(skip_all, fields(project = %self.id))]
    pub async fn versions(
        &self,
        client: &Modrinth,
        filters: &VersionFilters,
    ) -> Result<Vec<Version>> {
        client.project_versions(&self.id, filters, self.token(None)).await
    }

    pub async fn latest_version(
        &self,
        client: &Modrinth,
        filters: &VersionFilters,
    ) -> Result<Option<Version>> {
        Ok(self.versions(client, filters).await?.into_iter().next())
    }

    pub async fn oldest_version(
        &self,
        client: &Modrinth,
        filters: &VersionFilters,
    ) -> Result<Option<Version>> {
        Ok(self.versions(client, filters).await?.pop())
    }

    /// The version whose `version_number` is exactly `version_number`.
    pub async fn specific_version(
        &self,
        client: &Modrinth,
        version_number: &str,
    ) -> Result<Option<Version>> {
        Ok(self
            .versions(client, &VersionFilters::default())
            .await?
            .into_iter()
            .find(|v| v.version_number == version_number))
    }

    #[instrument(skip_all, fields(project = %self.id))]
    pub async fn team_members(&self, client: &Modrinth) -> Result<Vec<TeamMember>> {
        client.project_members(&self.id, self.token(None)).await
    }

    /// The team owning the project.
    ///
    /// Members are grouped by team id and the group matching the project's
    /// `team` is returned, or the first group when none matches.
    pub async fn team(&self, client: &Modrinth) -> Result<Team> {
        let mut teams = Team::group(self.team_members(client).await?);

        match teams.iter().position(|t| t.id() == self.team) {
            Some(index) => Ok(teams.swap_remove(index)),
            None if !teams.is_empty() => {
                warn!(
                    "No member of project {} belongs to team {}, using team {}",
                    self.id,
                    self.team,
                    teams[0].id()
                );
                Ok(teams.swap_remove(0))
            }
            None => Err(Error::InvalidParam(format!("project {} has no team members", self.id))),
        }
    }

    #[instrument(skip_all, fields(project = %self.id))]
    pub async fn dependencies(&self, client: &Modrinth) -> Result<Dependencies> {
        client.project_dependencies(&self.id, self.token(None)).await
    }

    pub async fn modify(
        &self,
        client: &Modrinth,
        patch: &ProjectPatch,
        auth: Option<&str>,
    ) -> Result<()> {
        client.modify_project(&self.id, patch, self.token(auth)).await
    }

    pub async fn delete(&self, client: &Modrinth, auth: Option<&str>) -> Result<()> {
        client.delete_project(&self.id, self.token(auth)).await
    }

    pub async fn change_icon(
        &self,
        client: &Modrinth,
        icon: Attachment,
        auth: Option<&str>,
    ) -> Result<()> {
        client.change_project_icon(&self.id, icon, self.token(auth)).await
    }

    pub async fn delete_icon(&self, client: &Modrinth, auth: Option<&str>) -> Result<()> {
        client.delete_project_icon(&self.id, self.token(auth)).await
    }

    pub async fn add_gallery_image(
        &self,
        client: &Modrinth,
        image: &GalleryImage,
        auth: Option<&str>,
    ) -> Result<()> {
        client.add_gallery_image(&self.id, image, self.token(auth)).await
    }

    pub async fn modify_gallery_image(
        &self,
        client: &Modrinth,
        patch: &GalleryPatch,
        auth: Option<&str>,
    ) -> Result<()> {
        client.modify_gallery_image(&self.id, patch, self.token(auth)).await
    }

    pub async fn delete_gallery_image(
        &self,
        client: &Modrinth,
        url: &str,
        auth: Option<&str>,
    ) -> Result<()> {
        client.delete_gallery_image(&self.id, url, self.token(auth)).await
    }

    /// Uploads a new version of this project. The project id of `draft` is
    /// replaced with this project's.
    #[instrument(skip_all, fields(project = %self.id))]
    pub async fn create_version(
        &self,
        client: &Modrinth,
        draft: &VersionDraft,
        files: Vec<Attachment>,
        auth: Option<&str>,
    ) -> Result<Version> {
        let draft = VersionDraft {
            project_id: self.id.clone(),
            ..draft.clone()
        };
        client.create_version(&draft, files, self.token(auth)).await
    }
}

impl Dependency {
    /// The version this dependency resolves to.
    ///
    /// A pinned version is fetched directly. Otherwise the latest version of
    /// the depended-on project is used, which is `None` when that project
    /// has no versions.
    #[instrument(skip_all, fields(target = ?self.target))]
    pub async fn version(&self, client: &Modrinth) -> Result<Option<Version>> {
        match &self.target {
            DependencyTarget::Version { version_id, .. } => {
                client.get_version(version_id, None).await.map(Some)
            }
            DependencyTarget::Project { project_id } => {
                let project = client.get_project(project_id, None).await?;
                project.latest_version(client, &VersionFilters::default()).await
            }
        }
    }
}

impl Version {
    pub async fn author(&self, client: &Modrinth) -> Result<User> {
        client.get_user(&self.author_id, None).await
    }

    pub async fn project(&self, client: &Modrinth) -> Result<Project> {
        client.get_project(&self.project_id, None).await
    }
}

impl User {
    fn token<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        resolve_auth(explicit, self.auth.as_deref())
    }

    pub async fn projects(&self, client: &Modrinth) -> Result<Vec<Project>> {
        client.user_projects(&self.id, self.token(None)).await
    }

    /// Number of projects the user is a member of.
    pub async fn project_count(&self, client: &Modrinth) -> Result<usize> {
        Ok(self.projects(client).await?.len())
    }

    pub async fn followed_projects(&self, client: &Modrinth) -> Result<Vec<Project>> {
        client.followed_projects(&self.id, self.token(None)).await
    }

    pub async fn notifications(&self, client: &Modrinth) -> Result<Vec<Notification>> {
        client.notifications(&self.id, self.token(None)).await
    }

    pub async fn follow(&self, client: &Modrinth, project: &str) -> Result<()> {
        client.follow_project(project, self.token(None)).await
    }

    pub async fn unfollow(&self, client: &Modrinth, project: &str) -> Result<()> {
        client.unfollow_project(project, self.token(None)).await
    }

    pub async fn create_project(
        &self,
        client: &Modrinth,
        draft: &ProjectDraft,
        icon: Option<Attachment>,
    ) -> Result<Project> {
        client.create_project(draft, icon, self.token(None)).await
    }
}
