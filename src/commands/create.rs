use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use super::{api_error, bound, execute, parse_opt, CommandOptions, OutputArgs};
use crate::{
    config::AppConfig,
    gitlab::{
        branches::CreateBranchOptions, groups::CreateGroupOptions,
        projects::CreateProjectOptions, GitlabClient, ResourceRef, Visibility,
    },
    output,
};

#[derive(Subcommand, Debug)]
pub enum CreateCommands {
    /// Create a new project
    Project(CreateProject),
    /// Create a new group or subgroup
    Group(CreateGroup),
    /// Create a new branch in a project
    Branch(CreateBranch),
}

pub async fn run(cmd: CreateCommands, config: &AppConfig) -> Result<()> {
    match cmd {
        CreateCommands::Project(c) => execute(c, config).await,
        CreateCommands::Group(c) => execute(c, config).await,
        CreateCommands::Branch(c) => execute(c, config).await,
    }
}

#[derive(Args, Debug)]
pub struct CreateProject {
    /// Name of the new project
    pub name: String,
    /// Repository path (defaults to a slug of the name)
    #[arg(long)]
    pub path: Option<String>,
    /// Namespace (group or user) ID or full path to create the project in
    #[arg(long)]
    pub namespace: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// public, private or internal
    #[arg(long)]
    pub visibility: Option<String>,
    #[arg(long)]
    pub default_branch: Option<String>,
    #[arg(long)]
    pub issues_enabled: Option<bool>,
    #[arg(long)]
    pub merge_requests_enabled: Option<bool>,
    #[arg(long)]
    pub wiki_enabled: Option<bool>,
    #[arg(long)]
    pub lfs_enabled: Option<bool>,
    #[command(flatten)]
    pub output: OutputArgs,
    #[arg(skip)]
    pub namespace_ref: Option<ResourceRef>,
}

impl CreateProject {
    fn options(&self) -> Result<CreateProjectOptions> {
        Ok(CreateProjectOptions {
            name: self.name.clone(),
            path: self.path.clone(),
            namespace_id: None,
            description: self.description.clone(),
            visibility: parse_opt::<Visibility>(&self.visibility)?,
            default_branch: self.default_branch.clone(),
            issues_enabled: self.issues_enabled,
            merge_requests_enabled: self.merge_requests_enabled,
            wiki_enabled: self.wiki_enabled,
            lfs_enabled: self.lfs_enabled,
        })
    }
}

impl CommandOptions for CreateProject {
    fn complete(&mut self) -> Result<()> {
        self.namespace_ref = self.namespace.as_deref().map(ResourceRef::parse);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("project name cannot be empty");
        }
        self.options().map(|_| ())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let mut opts = self.options()?;
        if let Some(ns) = &self.namespace_ref {
            let id = client
                .resolve_namespace_id(ns)
                .await
                .map_err(|e| api_error(e, &ns.to_string()))?;
            opts.namespace_id = Some(id);
        }

        let project = client
            .create_project(&opts)
            .await
            .map_err(|e| api_error(e, &self.name))?;
        info!(id = project.id, path = %project.path_with_namespace, "project created");

        output::print(std::slice::from_ref(&project), self.output.format())
    }
}

#[derive(Args, Debug)]
pub struct CreateGroup {
    /// Name of the new group
    pub name: String,
    /// URL path of the group (defaults to the name)
    #[arg(long)]
    pub path: Option<String>,
    /// Parent group ID or full path, to create a subgroup
    #[arg(long)]
    pub namespace: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// public, private or internal
    #[arg(long)]
    pub visibility: Option<String>,
    #[arg(long)]
    pub lfs_enabled: Option<bool>,
    #[arg(long)]
    pub request_access_enabled: Option<bool>,
    #[command(flatten)]
    pub output: OutputArgs,
    #[arg(skip)]
    pub parent: Option<ResourceRef>,
}

impl CreateGroup {
    fn options(&self) -> Result<CreateGroupOptions> {
        Ok(CreateGroupOptions {
            name: self.name.clone(),
            path: self.path.clone().unwrap_or_else(|| self.name.clone()),
            parent_id: None,
            description: self.description.clone(),
            visibility: parse_opt::<Visibility>(&self.visibility)?,
            lfs_enabled: self.lfs_enabled,
            request_access_enabled: self.request_access_enabled,
        })
    }
}

impl CommandOptions for CreateGroup {
    fn complete(&mut self) -> Result<()> {
        self.parent = self.namespace.as_deref().map(ResourceRef::parse);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("group name cannot be empty");
        }
        self.options().map(|_| ())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let mut opts = self.options()?;
        if let Some(parent) = &self.parent {
            let id = client
                .resolve_group_id(parent)
                .await
                .map_err(|e| api_error(e, &parent.to_string()))?;
            opts.parent_id = Some(id);
        }

        let group = client
            .create_group(&opts)
            .await
            .map_err(|e| api_error(e, &self.name))?;
        info!(id = group.id, path = %group.full_path, "group created");

        output::print(std::slice::from_ref(&group), self.output.format())
    }
}

#[derive(Args, Debug)]
pub struct CreateBranch {
    /// Name of the new branch
    pub name: String,
    /// Project ID or full path
    #[arg(short, long)]
    pub project: String,
    /// Branch, tag or commit SHA to branch from
    #[arg(short, long = "ref", value_name = "REF")]
    pub ref_name: String,
    #[command(flatten)]
    pub output: OutputArgs,
    #[arg(skip)]
    pub project_ref: Option<ResourceRef>,
}

impl CommandOptions for CreateBranch {
    fn complete(&mut self) -> Result<()> {
        self.project_ref = Some(ResourceRef::parse(&self.project));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("branch name cannot be empty");
        }
        if self.ref_name.trim().is_empty() {
            anyhow::bail!("--ref cannot be empty");
        }
        Ok(())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let project = bound(&self.project_ref, &self.project);
        let opts = CreateBranchOptions {
            branch: self.name.clone(),
            ref_name: self.ref_name.clone(),
        };
        let branch = client
            .create_branch(&project, &opts)
            .await
            .map_err(|e| api_error(e, &format!("{}@{}", self.project, self.ref_name)))?;

        output::print(std::slice::from_ref(&branch), self.output.format())
    }
}
