use std::path::Path;

use anyhow::Context;
use rinth::{
    models::{project::ProjectType, version::Version},
    search::{FacetGroup, Facets, Index, SearchQuery},
    ClientConfig, Modrinth, VersionFilters,
};
use tracing::{info, warn};

use crate::args::{Cli, Command, FilterArgs};

pub async fn process_args(args: &Cli) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ClientConfig::from_toml_file(path).await?,
        None => ClientConfig::default(),
    }
    .with_token(args.token.clone());

    let client = Modrinth::new(&config)?;

    match &args.command {
        Command::Search {
            query,
            project_type,
            categories,
            game_versions,
            index,
            offset,
            limit,
        } => {
            search(
                &client,
                query.as_deref(),
                *project_type,
                categories,
                game_versions,
                *index,
                *offset,
                *limit,
            )
            .await
        }
        Command::Project { id_or_slug } => project(&client, id_or_slug).await,
        Command::Versions {
            id_or_slug,
            filters,
        } => versions(&client, id_or_slug, filters).await,
        Command::Download {
            id_or_slug,
            version,
            recursive,
            dir,
            filters,
        } => download(&client, id_or_slug, version.as_deref(), *recursive, dir, filters).await,
        Command::User { id_or_username } => user(&client, id_or_username.as_deref()).await,
        Command::Categories { project_type } => categories(&client, *project_type).await,
    }
}

impl From<&FilterArgs> for VersionFilters {
    fn from(args: &FilterArgs) -> Self {
        VersionFilters {
            loaders: (!args.loaders.is_empty()).then(|| args.loaders.clone()),
            game_versions: (!args.game_versions.is_empty()).then(|| args.game_versions.clone()),
            featured: args.featured,
            version_types: args.version_types.clone(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn search(
    client: &Modrinth,
    query: Option<&str>,
    project_type: Option<ProjectType>,
    categories: &[String],
    game_versions: &[String],
    index: Index,
    offset: u32,
    limit: u32,
) -> anyhow::Result<()> {
    let mut facets = project_type.map(Facets::from_project_type).unwrap_or_default();
    if !categories.is_empty() {
        facets.add_group(categories.iter().fold(FacetGroup::new(), |g, c| g.category(c)));
    }
    if !game_versions.is_empty() {
        facets.add_group(game_versions.iter().fold(FacetGroup::new(), |g, v| g.version(v)));
    }

    let query = SearchQuery::builder()
        .query(query.unwrap_or_default())
        .facets(facets)
        .index(index)
        .offset(offset)
        .limit(limit)
        .build();

    let results = client.search(&query).await?;

    for hit in &results.hits {
        println!(
            "{:<24} {:<10} {:>12} downloads  {}",
            hit.slug.as_str(),
            hit.project_type.as_str(),
            hit.downloads,
            hit.title
        );
    }
    println!(
        "{}-{} of {}",
        results.offset,
        results.offset as usize + results.hits.len(),
        results.total_hits
    );

    Ok(())
}

async fn project(client: &Modrinth, id_or_slug: &str) -> anyhow::Result<()> {
    let project = client.get_project(id_or_slug, None).await?;

    println!("{} ({})", project.title, project.id);
    println!("{}", project.description);
    println!("Type: {}", project.project_type.as_str());
    println!("Categories: {}", project.all_categories().join(", "));
    println!("License: {}", project.license);
    println!("Downloads: {}, followers: {}", project.downloads, project.followers);

    let team = project.team(client).await?;
    for member in team.members() {
        match member.user() {
            Ok(user) => println!("  {} ({})", user.username, member.role),
            Err(e) => warn!("Cannot read a member of team {}: {e}", team.id()),
        }
    }

    Ok(())
}

fn print_version(version: &Version) {
    println!(
        "{:<24} {:<8} {:<10} {}",
        version.version_number,
        version.version_type.as_str(),
        version.id.as_str(),
        version.game_versions.join(", ")
    );
}

async fn versions(client: &Modrinth, id_or_slug: &str, filters: &FilterArgs) -> anyhow::Result<()> {
    let project = client.get_project(id_or_slug, None).await?;
    let versions = project.versions(client, &filters.into()).await?;

    if versions.is_empty() {
        warn!("No version of {} matches the filters", project.title);
    }
    versions.iter().for_each(print_version);

    Ok(())
}

async fn download(
    client: &Modrinth,
    id_or_slug: &str,
    version_number: Option<&str>,
    recursive: bool,
    dir: &Path,
    filters: &FilterArgs,
) -> anyhow::Result<()> {
    let project = client.get_project(id_or_slug, None).await?;

    let version = match version_number {
        Some(number) => project.specific_version(client, number).await?,
        None => project.latest_version(client, &filters.into()).await?,
    }
    .with_context(|| format!("{} has no matching version", project.title))?;

    info!("Downloading {} {}", project.title, version.version_number);

    for file in version.download(client, recursive).await? {
        file.write_to(dir).await?;
    }

    Ok(())
}

async fn user(client: &Modrinth, id_or_username: Option<&str>) -> anyhow::Result<()> {
    let user = match id_or_username {
        Some(id) => client.get_user(id, None).await?,
        None => client.user_from_auth(None).await?,
    };

    println!("{} ({})", user.username, user.id);
    if let Some(bio) = &user.bio {
        println!("{bio}");
    }

    for project in user.projects(client).await? {
        println!("  {:<24} {}", project.slug.as_str(), project.title);
    }

    Ok(())
}

async fn categories(client: &Modrinth, project_type: ProjectType) -> anyhow::Result<()> {
    let categories = client.categories().await?;

    for (header, names) in categories.by_header(project_type) {
        println!("{header}:");
        println!("  {}", names.join(", "));
    }

    Ok(())
}
