use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["entorno"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn collect_defaults() {
    let cli = Cli::try_parse_from(["entorno", "collect", "--input", "pontos.csv"]).unwrap();
    match cli.command {
        Some(Commands::Collect {
            input,
            throttle_ms,
            max_origins,
            types,
            no_skip,
            pair_cols,
            dry_run,
        }) => {
            assert_eq!(input, PathBuf::from("pontos.csv"));
            assert_eq!(throttle_ms, 300);
            assert!(max_origins.is_none());
            assert!(types.is_none());
            assert!(!no_skip);
            assert!(pair_cols.is_empty());
            assert!(!dry_run);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn collect_with_all_flags() {
    let cli = Cli::try_parse_from([
        "entorno",
        "collect",
        "--input",
        "pontos.csv",
        "--throttle-ms",
        "0",
        "--max-origins",
        "2",
        "--types",
        "hospital,escola publica",
        "--no-skip",
        "--pair-cols",
        "Centro (Lat, Long)",
        "--pair-cols",
        "Escola (Lat, Long)",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            throttle_ms: 0,
            max_origins: Some(2),
            no_skip: true,
            dry_run: true,
            ref types,
            ref pair_cols,
            ..
        }) if types.as_deref() == Some("hospital,escola publica")
            && pair_cols.len() == 2
            && pair_cols[0] == "Centro (Lat, Long)"
            && pair_cols[1] == "Escola (Lat, Long)"
    ));
}

#[test]
fn collect_requires_input() {
    assert!(Cli::try_parse_from(["entorno", "collect"]).is_err());
}

#[test]
fn search_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "entorno",
        "search",
        "--lat",
        "-23.5505",
        "--lng",
        "-46.6333",
        "--category",
        "school",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Search { lat, lng, ref category })
            if (lat + 23.5505).abs() < 1e-9 && (lng + 46.6333).abs() < 1e-9 && category == "school"
    ));
}

#[test]
fn concat_all_flag() {
    let cli = Cli::try_parse_from(["entorno", "concat", "--name", "sp", "--all"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Concat { ref name, all: true }) if name == "sp"
    ));
}

#[test]
fn matrix_and_categories_parse() {
    let cli = Cli::try_parse_from(["entorno", "matrix"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Matrix { throttle_ms: 300 })
    ));
    let cli = Cli::try_parse_from(["entorno", "categories"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Categories)));
}
