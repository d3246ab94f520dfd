use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["acdb"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["acdb", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["acdb", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn collect_without_flags_uses_config_range() {
    let cli = Cli::try_parse_from(["acdb", "collect"]).unwrap();
    let Some(Commands::Collect(args)) = cli.command else {
        panic!("expected collect command");
    };
    assert!(args.from.is_none());
    assert!(args.to.is_none());
    assert!(!args.skip_recorded);
    assert!(!args.dry_run);
}

#[test]
fn collect_with_range_and_flags() {
    let cli = Cli::try_parse_from([
        "acdb",
        "collect",
        "--from",
        "600",
        "--to",
        "699",
        "--skip-recorded",
        "--dry-run",
    ])
    .unwrap();
    let Some(Commands::Collect(args)) = cli.command else {
        panic!("expected collect command");
    };
    assert_eq!(args.from.map(|c| c.to_string()).as_deref(), Some("600"));
    assert_eq!(args.to.map(|c| c.to_string()).as_deref(), Some("699"));
    assert!(args.skip_recorded);
    assert!(args.dry_run);
}

#[test]
fn collect_rejects_malformed_code() {
    let result = Cli::try_parse_from(["acdb", "collect", "--from", "12"]);
    assert!(result.is_err(), "two-digit code must be rejected");

    let result = Cli::try_parse_from(["acdb", "collect", "--to", "1000"]);
    assert!(result.is_err(), "four-digit code must be rejected");
}

#[test]
fn show_parses_zero_padded_code() {
    let cli = Cli::try_parse_from(["acdb", "show", "007"]).unwrap();
    let Some(Commands::Show { code }) = cli.command else {
        panic!("expected show command");
    };
    assert_eq!(code.to_string(), "007");
}

#[test]
fn show_requires_code() {
    assert!(Cli::try_parse_from(["acdb", "show"]).is_err());
}

#[test]
fn list_defaults() {
    let cli = Cli::try_parse_from(["acdb", "list"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::List {
            valid: false,
            limit: 1000
        })
    ));
}

#[test]
fn list_valid_with_limit() {
    let cli = Cli::try_parse_from(["acdb", "list", "--valid", "--limit", "25"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::List {
            valid: true,
            limit: 25
        })
    ));
}

#[test]
fn runs_default_limit() {
    let cli = Cli::try_parse_from(["acdb", "runs"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Runs { limit: 20 })));
}
