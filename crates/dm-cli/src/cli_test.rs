use super::*;
use clap::CommandFactory;
use serial_test::serial;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
#[serial]
fn no_subcommand_means_run() {
    std::env::remove_var("DOCMIG_CONNECTION_STRING");
    let cli = Cli::try_parse_from(["docmig"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.global.connection_string, None);
}

#[test]
#[serial]
fn accepts_legacy_connection_string_flag() {
    let cli = Cli::try_parse_from([
        "docmig",
        "--connection_string",
        "mongodb://db.internal:27017",
    ])
    .unwrap();
    assert_eq!(
        cli.global.connection_string.as_deref(),
        Some("mongodb://db.internal:27017")
    );
}

#[test]
#[serial]
fn connection_string_from_environment() {
    std::env::set_var("DOCMIG_CONNECTION_STRING", "mongodb://env-host:27017");
    let cli = Cli::try_parse_from(["docmig", "status"]).unwrap();
    std::env::remove_var("DOCMIG_CONNECTION_STRING");
    assert_eq!(
        cli.global.connection_string.as_deref(),
        Some("mongodb://env-host:27017")
    );
    assert!(matches!(cli.command, Some(Commands::Status(_))));
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["docmig", "unlock", "--set-version", "4", "-d", "accounts"])
        .unwrap();
    assert_eq!(cli.global.database.as_deref(), Some("accounts"));
    match cli.command {
        Some(Commands::Unlock(args)) => assert_eq!(args.set_version, Some(4)),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn status_json_output() {
    let cli = Cli::try_parse_from(["docmig", "status", "-o", "json"]).unwrap();
    match cli.command {
        Some(Commands::Status(args)) => assert_eq!(args.output, StatusOutput::Json),
        other => panic!("unexpected command: {other:?}"),
    }
}
