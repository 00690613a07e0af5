use anyhow::Result;
use clap::{Args, Subcommand};

use super::{api_error, bound, execute, parse_opt, CommandOptions, OutputArgs};
use crate::{
    config::AppConfig,
    gitlab::{
        branches::ProtectBranchOptions, groups::EditGroupOptions, projects::EditProjectOptions,
        GitlabClient, ResourceRef, Visibility,
    },
    output,
};

#[derive(Subcommand, Debug)]
pub enum EditCommands {
    /// Update project settings
    Project(EditProject),
    /// Update group settings
    Group(EditGroup),
    /// Protect or unprotect a branch
    Branch(EditBranch),
}

pub async fn run(cmd: EditCommands, config: &AppConfig) -> Result<()> {
    match cmd {
        EditCommands::Project(c) => execute(c, config).await,
        EditCommands::Group(c) => execute(c, config).await,
        EditCommands::Branch(c) => execute(c, config).await,
    }
}

/// Only the flags given on the command line are sent
#[derive(Args, Debug)]
pub struct EditProject {
    /// Project ID or full path
    pub project: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub path: Option<String>,
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
    pub project_ref: Option<ResourceRef>,
}

impl EditProject {
    fn options(&self) -> Result<EditProjectOptions> {
        Ok(EditProjectOptions {
            name: self.name.clone(),
            path: self.path.clone(),
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

impl CommandOptions for EditProject {
    fn complete(&mut self) -> Result<()> {
        self.project_ref = Some(ResourceRef::parse(&self.project));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.options()?.is_empty() {
            anyhow::bail!("nothing to change, pass at least one setting flag");
        }
        Ok(())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let project = bound(&self.project_ref, &self.project);
        let updated = client
            .edit_project(&project, &self.options()?)
            .await
            .map_err(|e| api_error(e, &self.project))?;

        output::print(std::slice::from_ref(&updated), self.output.format())
    }
}

#[derive(Args, Debug)]
pub struct EditGroup {
    /// Group ID or full path
    pub group: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub path: Option<String>,
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
    pub group_ref: Option<ResourceRef>,
}

impl EditGroup {
    fn options(&self) -> Result<EditGroupOptions> {
        Ok(EditGroupOptions {
            name: self.name.clone(),
            path: self.path.clone(),
            description: self.description.clone(),
            visibility: parse_opt::<Visibility>(&self.visibility)?,
            lfs_enabled: self.lfs_enabled,
            request_access_enabled: self.request_access_enabled,
        })
    }
}

impl CommandOptions for EditGroup {
    fn complete(&mut self) -> Result<()> {
        self.group_ref = Some(ResourceRef::parse(&self.group));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.options()?.is_empty() {
            anyhow::bail!("nothing to change, pass at least one setting flag");
        }
        Ok(())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let group = bound(&self.group_ref, &self.group);
        let updated = client
            .edit_group(&group, &self.options()?)
            .await
            .map_err(|e| api_error(e, &self.group))?;

        output::print(std::slice::from_ref(&updated), self.output.format())
    }
}

#[derive(Args, Debug)]
pub struct EditBranch {
    /// Branch name
    pub name: String,
    /// Project ID or full path
    #[arg(short, long)]
    pub project: String,
    /// Protect the branch
    #[arg(long)]
    pub protect: bool,
    /// Remove protection from the branch
    #[arg(long)]
    pub unprotect: bool,
    /// Let developers push to the protected branch
    #[arg(long)]
    pub developers_can_push: bool,
    /// Let developers merge into the protected branch
    #[arg(long)]
    pub developers_can_merge: bool,
    #[command(flatten)]
    pub output: OutputArgs,
    #[arg(skip)]
    pub project_ref: Option<ResourceRef>,
}

impl CommandOptions for EditBranch {
    fn complete(&mut self) -> Result<()> {
        self.project_ref = Some(ResourceRef::parse(&self.project));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        match (self.protect, self.unprotect) {
            (true, true) => anyhow::bail!("--protect and --unprotect cannot be used together"),
            (false, false) => anyhow::bail!("one of --protect or --unprotect is required"),
            _ => {}
        }
        if self.unprotect && (self.developers_can_push || self.developers_can_merge) {
            anyhow::bail!("--developers-can-push and --developers-can-merge require --protect");
        }
        Ok(())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let project = bound(&self.project_ref, &self.project);
        let target = format!("{}:{}", self.project, self.name);
        let result = if self.protect {
            let opts = ProtectBranchOptions {
                developers_can_push: self.developers_can_push.then_some(true),
                developers_can_merge: self.developers_can_merge.then_some(true),
            };
            client.protect_branch(&project, &self.name, &opts).await
        } else {
            client.unprotect_branch(&project, &self.name).await
        };
        let branch = result.map_err(|e| api_error(e, &target))?;

        output::print(std::slice::from_ref(&branch), self.output.format())
    }
}
