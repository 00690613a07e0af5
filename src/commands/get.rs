use anyhow::Result;
use clap::{Args, Subcommand};

use super::{
    api_error, bound, execute, parse_opt, validate_order_by, CommandOptions, ListArgs,
    OutputArgs,
};
use crate::{
    config::AppConfig,
    constants::{
        DEFAULT_BRANCHES_PER_PAGE, DEFAULT_FILES_PER_PAGE, DEFAULT_GROUPS_PER_PAGE,
        DEFAULT_PROJECTS_PER_PAGE,
    },
    gitlab::{
        branches::ListBranchesOptions, files::ListTreeOptions, groups::ListGroupsOptions,
        projects::ListProjectsOptions, GitlabClient, ResourceRef, SortOrder, Visibility,
    },
    output,
    pagination::paginate,
};

const PROJECT_ORDER_BY: &[&str] = &[
    "id",
    "name",
    "path",
    "created_at",
    "updated_at",
    "last_activity_at",
];
const GROUP_ORDER_BY: &[&str] = &["name", "path", "id"];

#[derive(Subcommand, Debug)]
pub enum GetCommands {
    /// List projects, optionally those of a single group
    #[command(visible_alias = "project")]
    Projects(GetProjects),
    /// List groups, optionally the subgroups of a single group
    #[command(visible_alias = "group")]
    Groups(GetGroups),
    /// List the branches of a project
    #[command(visible_alias = "branch")]
    Branches(GetBranches),
    /// List the repository tree of a project
    #[command(visible_alias = "file")]
    Files(GetFiles),
}

pub async fn run(cmd: GetCommands, config: &AppConfig) -> Result<()> {
    match cmd {
        GetCommands::Projects(c) => execute(c, config).await,
        GetCommands::Groups(c) => execute(c, config).await,
        GetCommands::Branches(c) => execute(c, config).await,
        GetCommands::Files(c) => execute(c, config).await,
    }
}

#[derive(Args, Debug)]
pub struct GetProjects {
    #[command(flatten)]
    pub list: ListArgs,
    /// Only projects owned by the current user
    #[arg(long)]
    pub owned: bool,
    /// Only projects the current user is a member of
    #[arg(long)]
    pub membership: bool,
    /// Only projects starred by the current user
    #[arg(long)]
    pub starred: bool,
    /// Only archived projects
    #[arg(long)]
    pub archived: bool,
    /// Match projects by name
    #[arg(long)]
    pub search: Option<String>,
    /// public, private or internal
    #[arg(long)]
    pub visibility: Option<String>,
    /// id, name, path, created_at, updated_at or last_activity_at
    #[arg(long)]
    pub order_by: Option<String>,
    /// asc or desc
    #[arg(long)]
    pub sort: Option<String>,
    /// List the projects of this group (ID or full path)
    #[arg(long, value_name = "GROUP")]
    pub from_group: Option<String>,
    #[command(flatten)]
    pub output: OutputArgs,
    #[arg(skip)]
    pub group: Option<ResourceRef>,
}

impl GetProjects {
    fn options(&self) -> Result<ListProjectsOptions> {
        Ok(ListProjectsOptions {
            owned: self.owned.then_some(true),
            membership: self.membership.then_some(true),
            starred: self.starred.then_some(true),
            archived: self.archived.then_some(true),
            search: self.search.clone(),
            visibility: parse_opt::<Visibility>(&self.visibility)?,
            order_by: self.order_by.clone(),
            sort: parse_opt::<SortOrder>(&self.sort)?,
        })
    }
}

impl CommandOptions for GetProjects {
    fn complete(&mut self) -> Result<()> {
        self.group = self.from_group.as_deref().map(ResourceRef::parse);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.list.validate()?;
        validate_order_by(&self.order_by, PROJECT_ORDER_BY)?;
        self.options().map(|_| ())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let opts = self.options()?;
        let cursor = self.list.cursor(DEFAULT_PROJECTS_PER_PAGE);
        let projects = paginate(self.list.all_pages, cursor, |c| {
            let opts = opts.clone();
            let group = self.group.clone();
            async move {
                match group {
                    Some(g) => client.list_group_projects(&g, &opts, c).await,
                    None => client.list_projects(&opts, c).await,
                }
            }
        })
        .await
        .map_err(|e| api_error(e, self.from_group.as_deref().unwrap_or("projects")))?;

        output::print(&projects, self.output.format())
    }
}

#[derive(Args, Debug)]
pub struct GetGroups {
    #[command(flatten)]
    pub list: ListArgs,
    /// Only groups owned by the current user
    #[arg(long)]
    pub owned: bool,
    /// Include every group the current user can see
    #[arg(long)]
    pub all_available: bool,
    /// Match groups by name or path
    #[arg(long)]
    pub search: Option<String>,
    /// name, path or id
    #[arg(long)]
    pub order_by: Option<String>,
    /// asc or desc
    #[arg(long)]
    pub sort: Option<String>,
    /// List the subgroups of this group (ID or full path)
    #[arg(long, value_name = "GROUP")]
    pub from_group: Option<String>,
    #[command(flatten)]
    pub output: OutputArgs,
    #[arg(skip)]
    pub group: Option<ResourceRef>,
}

impl GetGroups {
    fn options(&self) -> Result<ListGroupsOptions> {
        Ok(ListGroupsOptions {
            owned: self.owned.then_some(true),
            all_available: self.all_available.then_some(true),
            search: self.search.clone(),
            order_by: self.order_by.clone(),
            sort: parse_opt::<SortOrder>(&self.sort)?,
        })
    }
}

impl CommandOptions for GetGroups {
    fn complete(&mut self) -> Result<()> {
        self.group = self.from_group.as_deref().map(ResourceRef::parse);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.list.validate()?;
        validate_order_by(&self.order_by, GROUP_ORDER_BY)?;
        self.options().map(|_| ())
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let opts = self.options()?;
        let cursor = self.list.cursor(DEFAULT_GROUPS_PER_PAGE);
        let groups = paginate(self.list.all_pages, cursor, |c| {
            let opts = opts.clone();
            let group = self.group.clone();
            async move {
                match group {
                    Some(g) => client.list_subgroups(&g, &opts, c).await,
                    None => client.list_groups(&opts, c).await,
                }
            }
        })
        .await
        .map_err(|e| api_error(e, self.from_group.as_deref().unwrap_or("groups")))?;

        output::print(&groups, self.output.format())
    }
}

#[derive(Args, Debug)]
pub struct GetBranches {
    /// Project ID or full path
    pub project: String,
    #[command(flatten)]
    pub list: ListArgs,
    /// Match branches by name
    #[arg(long)]
    pub search: Option<String>,
    #[command(flatten)]
    pub output: OutputArgs,
    #[arg(skip)]
    pub project_ref: Option<ResourceRef>,
}

impl CommandOptions for GetBranches {
    fn complete(&mut self) -> Result<()> {
        self.project_ref = Some(ResourceRef::parse(&self.project));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            anyhow::bail!("project cannot be empty");
        }
        self.list.validate()
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let project = bound(&self.project_ref, &self.project);
        let opts = ListBranchesOptions {
            search: self.search.clone(),
        };
        let cursor = self.list.cursor(DEFAULT_BRANCHES_PER_PAGE);
        let branches = paginate(self.list.all_pages, cursor, |c| {
            let opts = opts.clone();
            let project = project.clone();
            async move { client.list_branches(&project, &opts, c).await }
        })
        .await
        .map_err(|e| api_error(e, &self.project))?;

        output::print(&branches, self.output.format())
    }
}

#[derive(Args, Debug)]
pub struct GetFiles {
    /// Project ID or full path
    pub project: String,
    #[command(flatten)]
    pub list: ListArgs,
    /// Branch, tag or commit to list (defaults to the default branch)
    #[arg(long = "ref", value_name = "REF")]
    pub ref_name: Option<String>,
    /// Directory inside the repository
    #[arg(long)]
    pub path: Option<String>,
    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,
    #[command(flatten)]
    pub output: OutputArgs,
    #[arg(skip)]
    pub project_ref: Option<ResourceRef>,
}

impl CommandOptions for GetFiles {
    fn complete(&mut self) -> Result<()> {
        self.project_ref = Some(ResourceRef::parse(&self.project));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            anyhow::bail!("project cannot be empty");
        }
        self.list.validate()
    }

    async fn run(&self, client: &GitlabClient) -> Result<()> {
        let project = bound(&self.project_ref, &self.project);
        let opts = ListTreeOptions {
            ref_name: self.ref_name.clone(),
            path: self.path.clone(),
            recursive: self.recursive.then_some(true),
        };
        let cursor = self.list.cursor(DEFAULT_FILES_PER_PAGE);
        let nodes = paginate(self.list.all_pages, cursor, |c| {
            let opts = opts.clone();
            let project = project.clone();
            async move { client.list_tree(&project, &opts, c).await }
        })
        .await
        .map_err(|e| api_error(e, &self.project))?;

        output::print(&nodes, self.output.format())
    }
}
