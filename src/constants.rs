/// Name of the persisted credential file, created under the home directory
pub const GLCTL_CONFIG: &str = ".glctl.yaml";

/// Prefix shared by every environment variable the CLI reads
pub const ENV_PREFIX: &str = "GITLAB";

/// Page size used when every page of a listing is requested
pub const ALL_PAGES_PER_PAGE: u32 = 100;

pub const DEFAULT_PROJECTS_PER_PAGE: u32 = 50;
pub const DEFAULT_GROUPS_PER_PAGE: u32 = 50;
pub const DEFAULT_BRANCHES_PER_PAGE: u32 = 50;
pub const DEFAULT_FILES_PER_PAGE: u32 = 100;

/// Largest page size the GitLab API honours
pub const MAX_PER_PAGE: u32 = 100;

pub const NO_RESULTS_HINT: &str = "No results found.";
