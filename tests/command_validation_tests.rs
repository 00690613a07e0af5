use clap::Parser;
use glctl::commands::{
    create::CreateCommands, delete::DeleteCommands, edit::EditCommands, get::GetCommands,
    CommandOptions, Commands,
};
use glctl::Cli;

fn parse(args: &[&str]) -> Commands {
    let mut argv = vec!["glctl"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv)
        .expect("arguments should parse")
        .cmd
        .expect("a command")
}

fn check<C: CommandOptions>(mut cmd: C) -> anyhow::Result<()> {
    cmd.complete()?;
    cmd.validate()
}

fn check_get(args: &[&str]) -> anyhow::Result<()> {
    match parse(args) {
        Commands::Get { cmd } => match cmd {
            GetCommands::Projects(c) => check(c),
            GetCommands::Groups(c) => check(c),
            GetCommands::Branches(c) => check(c),
            GetCommands::Files(c) => check(c),
        },
        other => panic!("unexpected command {other:?}"),
    }
}

fn check_create(args: &[&str]) -> anyhow::Result<()> {
    match parse(args) {
        Commands::Create { cmd } => match cmd {
            CreateCommands::Project(c) => check(c),
            CreateCommands::Group(c) => check(c),
            CreateCommands::Branch(c) => check(c),
        },
        other => panic!("unexpected command {other:?}"),
    }
}

fn check_edit(args: &[&str]) -> anyhow::Result<()> {
    match parse(args) {
        Commands::Edit { cmd } => match cmd {
            EditCommands::Project(c) => check(c),
            EditCommands::Group(c) => check(c),
            EditCommands::Branch(c) => check(c),
        },
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_list_projects_accepts_known_values() {
    check_get(&[
        "get", "projects", "--visibility", "internal", "--sort", "asc", "--order-by", "name",
    ])
    .unwrap();
}

#[test]
fn test_list_projects_rejects_unknown_visibility() {
    let err = check_get(&["get", "projects", "--visibility", "secret"]).unwrap_err();
    assert!(err.to_string().contains("invalid visibility 'secret'"));
}

#[test]
fn test_list_commands_reject_unknown_sort() {
    let err = check_get(&["get", "projects", "--sort", "up"]).unwrap_err();
    assert!(err.to_string().contains("invalid sort order 'up'"));

    let err = check_get(&["get", "groups", "--sort", "random"]).unwrap_err();
    assert!(err.to_string().contains("invalid sort order 'random'"));
}

#[test]
fn test_list_groups_rejects_unknown_order_by() {
    let err = check_get(&["get", "groups", "--order-by", "stars"]).unwrap_err();
    assert!(err.to_string().contains("invalid order-by 'stars'"));
}

#[test]
fn test_per_page_bounds() {
    assert!(check_get(&["get", "branches", "team/api", "--per-page", "100"]).is_ok());
    assert!(check_get(&["get", "branches", "team/api", "--per-page", "101"]).is_err());
    assert!(check_get(&["get", "files", "team/api", "--page", "0"]).is_err());
}

#[test]
fn test_create_rejects_unknown_visibility() {
    let err = check_create(&["create", "group", "platform", "--visibility", "hidden"]).unwrap_err();
    assert!(err.to_string().contains("invalid visibility"));
    assert!(check_create(&["create", "project", "api", "--visibility", "private"]).is_ok());
}

#[test]
fn test_edit_requires_a_change() {
    let err = check_edit(&["edit", "project", "team/api"]).unwrap_err();
    assert!(err.to_string().contains("nothing to change"));
    assert!(check_edit(&["edit", "project", "team/api", "--wiki-enabled", "false"]).is_ok());
    assert!(check_edit(&["edit", "group", "team", "--visibility", "nope"]).is_err());
}

#[test]
fn test_protect_and_unprotect_are_exclusive() {
    let err = check_edit(&[
        "edit", "branch", "main", "--project", "team/api", "--protect", "--unprotect",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("cannot be used together"));

    let err = check_edit(&["edit", "branch", "main", "--project", "team/api"]).unwrap_err();
    assert!(err.to_string().contains("is required"));

    let err = check_edit(&[
        "edit",
        "branch",
        "main",
        "--project",
        "team/api",
        "--unprotect",
        "--developers-can-push",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("require --protect"));

    check_edit(&[
        "edit",
        "branch",
        "main",
        "--project",
        "team/api",
        "--protect",
        "--developers-can-merge",
    ])
    .unwrap();
}

#[test]
fn test_delete_files_requires_paths() {
    let argv = ["glctl", "delete", "files", "--project", "1", "--branch", "main"];
    assert!(Cli::try_parse_from(argv).is_err());

    match parse(&["delete", "files", "a.txt", "b.txt", "-p", "1", "-b", "main"]) {
        Commands::Delete {
            cmd: DeleteCommands::Files(c),
        } => {
            assert_eq!(c.paths, vec!["a.txt", "b.txt"]);
            check(c).unwrap();
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_listing_rejects_blank_project() {
    let err = check_get(&["get", "branches", " "]).unwrap_err();
    assert!(err.to_string().contains("project cannot be empty"));

    let err = check_get(&["get", "files", ""]).unwrap_err();
    assert!(err.to_string().contains("project cannot be empty"));
}
