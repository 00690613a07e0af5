use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use super::{api_error, bound, execute, CommandOptions};
use crate::{
    config::AppConfig,
    gitlab::{files::DeleteFileOptions, GitlabClient, ResourceRef},
};

#[derive(Subcommand, Debug)]
pub enum DeleteCommands {
    /// Delete a project
    Project(DeleteProject),
    /// Delete a group and everything in it
    Group(DeleteGroup),
    /// Delete a branch
    Branch(DeleteBranch),
    /// Delete files from a branch, one commit per file
    #[command(visible_alias = "file")]
    Files(DeleteFiles),
}

pub async fn run(cmd: DeleteCommands, config: &AppConfig) -> Result<()> {
    match cmd {
        DeleteCommands::Project(c) => execute(c, config).await,
        DeleteCommands::Group(c) => execute(c, config).await,
        DeleteCommands::Branch(c) => execute(c, config).await,
        DeleteCommands::Files(c) => execute(c, config).await,
    }
}

#[derive(Args, Debug)]
pub struct DeleteProject {
    /// Project ID or full path
    pub project: String,
    #[arg(skip)]
    pub project_ref: Option<ResourceRef>,
}

impl CommandOptions for DeleteProject {
    fn complete(&mut self) -> Result<()> {
        self.project_ref = Some(ResourceRef::parse(&self.project));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            anyhow::bail!("project cannot be empty");
        }
        Ok(())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let project = bound(&self.project_ref, &self.project);
        client
            .delete_project(&project)
            .await
            .map_err(|e| api_error(e, &self.project))?;
        println!("Project ({}) has been deleted", self.project);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteGroup {
    /// Group ID or full path
    pub group: String,
    #[arg(skip)]
    pub group_ref: Option<ResourceRef>,
}

impl CommandOptions for DeleteGroup {
    fn complete(&mut self) -> Result<()> {
        self.group_ref = Some(ResourceRef::parse(&self.group));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.group.trim().is_empty() {
            anyhow::bail!("group cannot be empty");
        }
        Ok(())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let group = bound(&self.group_ref, &self.group);
        client
            .delete_group(&group)
            .await
            .map_err(|e| api_error(e, &self.group))?;
        println!("Group ({}) has been deleted", self.group);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteBranch {
    /// Branch name
    pub name: String,
    /// Project ID or full path
    #[arg(short, long)]
    pub project: String,
    #[arg(skip)]
    pub project_ref: Option<ResourceRef>,
}

impl CommandOptions for DeleteBranch {
    fn complete(&mut self) -> Result<()> {
        self.project_ref = Some(ResourceRef::parse(&self.project));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("branch name cannot be empty");
        }
        Ok(())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let project = bound(&self.project_ref, &self.project);
        client
            .delete_branch(&project, &self.name)
            .await
            .map_err(|e| api_error(e, &format!("{}:{}", self.project, self.name)))?;
        println!("Branch ({}) has been deleted from {}", self.name, self.project);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteFiles {
    /// Repository paths of the files to delete
    #[arg(required = true, num_args = 1..)]
    pub paths: Vec<String>,
    /// Project ID or full path
    #[arg(short, long)]
    pub project: String,
    /// Branch to commit the deletions to
    #[arg(short, long)]
    pub branch: String,
    /// Commit message (defaults to "Delete <path>")
    #[arg(short, long)]
    pub message: Option<String>,
    #[arg(skip)]
    pub project_ref: Option<ResourceRef>,
}

impl CommandOptions for DeleteFiles {
    fn complete(&mut self) -> Result<()> {
        self.project_ref = Some(ResourceRef::parse(&self.project));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.branch.trim().is_empty() {
            anyhow::bail!("--branch cannot be empty");
        }
        if let Some(p) = self.paths.iter().find(|p| p.trim().is_empty()) {
            anyhow::bail!("invalid file path '{p}'");
        }
        Ok(())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let project = bound(&self.project_ref, &self.project);
        for path in &self.paths {
            let opts = DeleteFileOptions {
                branch: self.branch.clone(),
                commit_message: self
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("Delete {path}")),
            };
            client
                .delete_file(&project, path, &opts)
                .await
                .map_err(|e| api_error(e, &format!("{}:{}", self.project, path)))?;
            info!(%path, branch = %self.branch, "file deleted");
            println!("File ({path}) has been deleted from {}", self.branch);
        }
        Ok(())
    }
}
