use super::*;

#[test]
fn parses_analyze_command() {
    let cli = Cli::try_parse_from(["novascan", "analyze", "--text", "this is great"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Analyze { ref text }) if text == "this is great"
    ));
}

#[test]
fn analyze_requires_text() {
    assert!(Cli::try_parse_from(["novascan", "analyze"]).is_err());
}

#[test]
fn parses_process_with_defaults() {
    let cli = Cli::try_parse_from(["novascan", "process", "--input", "posts.json"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Process {
            ref input,
            query: None,
            min_quality: None,
            filters: None,
        }) if input == &PathBuf::from("posts.json")
    ));
}

#[test]
fn parses_process_with_query_threshold_and_filters() {
    let cli = Cli::try_parse_from([
        "novascan",
        "process",
        "--input",
        "posts.json",
        "--query",
        "invoice software",
        "--min-quality",
        "55",
        "--filters",
        "filters.json",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Process {
            query,
            min_quality,
            filters,
            ..
        }) => {
            assert_eq!(query.as_deref(), Some("invoice software"));
            assert_eq!(min_quality, Some(55.0));
            assert_eq!(filters, Some(PathBuf::from("filters.json")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn process_rejects_non_numeric_threshold() {
    let result = Cli::try_parse_from([
        "novascan",
        "process",
        "--input",
        "posts.json",
        "--min-quality",
        "high",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_collect_with_several_inputs() {
    let cli = Cli::try_parse_from([
        "novascan",
        "collect",
        "--input",
        "reddit.json",
        "--input",
        "hn.json",
        "--query",
        "crm",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Collect { input, query }) => {
            assert_eq!(input, vec![PathBuf::from("reddit.json"), PathBuf::from("hn.json")]);
            assert_eq!(query, "crm");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn collect_requires_input_and_query() {
    assert!(Cli::try_parse_from(["novascan", "collect", "--query", "crm"]).is_err());
    assert!(Cli::try_parse_from(["novascan", "collect", "--input", "a.json"]).is_err());
}

#[test]
fn parses_heuristics_command() {
    let cli = Cli::try_parse_from(["novascan", "heuristics"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Heuristics)));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["novascan"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}
