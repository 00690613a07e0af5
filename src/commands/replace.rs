use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::{api_error, bound, execute, CommandOptions};
use crate::{
    config::AppConfig,
    gitlab::{files::UpdateFileOptions, GitlabClient, ResourceRef},
};

#[derive(Subcommand, Debug)]
pub enum ReplaceCommands {
    /// Replace a repository file with the content of a local file
    File(ReplaceFile),
}

pub async fn run(cmd: ReplaceCommands, config: &AppConfig) -> Result<()> {
    match cmd {
        ReplaceCommands::File(c) => execute(c, config).await,
    }
}

#[derive(Args, Debug)]
pub struct ReplaceFile {
    /// Path of the file inside the repository
    pub path: String,
    /// Project ID or full path
    #[arg(short, long)]
    pub project: String,
    /// Branch to commit the change to
    #[arg(short, long)]
    pub branch: String,
    /// Local file holding the new content
    #[arg(short = 'f', long, value_name = "LOCAL_FILE")]
    pub from_file: PathBuf,
    /// Commit message (defaults to "Update <path>")
    #[arg(short, long)]
    pub message: Option<String>,
    #[arg(skip)]
    pub project_ref: Option<ResourceRef>,
    #[arg(skip)]
    pub content: Vec<u8>,
}

impl CommandOptions for ReplaceFile {
    fn complete(&mut self) -> Result<()> {
        self.project_ref = Some(ResourceRef::parse(&self.project));
        self.content = fs::read(&self.from_file)
            .with_context(|| format!("Failed to read file: {}", self.from_file.display()))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            anyhow::bail!("repository file path cannot be empty");
        }
        if self.branch.trim().is_empty() {
            anyhow::bail!("--branch cannot be empty");
        }
        Ok(())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let project = bound(&self.project_ref, &self.project);
        let opts = UpdateFileOptions {
            branch: self.branch.clone(),
            content: base64::encode(&self.content),
            encoding: Some("base64".to_string()),
            commit_message: self
                .message
                .clone()
                .unwrap_or_else(|| format!("Update {}", self.path)),
        };
        let commit = client
            .update_file(&project, &self.path, &opts)
            .await
            .map_err(|e| api_error(e, &format!("{}:{}", self.project, self.path)))?;

        println!(
            "File ({}) has been replaced on {}",
            commit.file_path, commit.branch
        );
        Ok(())
    }
}
