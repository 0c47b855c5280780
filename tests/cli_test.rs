//! Argument parsing tests for the infotree command line.

use clap::Parser;
use infotree::application::AggregateKind;
use infotree::cli::{Cli, Commands};
use rstest::rstest;

#[test]
fn given_tree_command_when_parsed_then_full_flag_is_read() {
    let cli = Cli::try_parse_from(["infotree", "tree", "model.toml", "--full"]).unwrap();
    match cli.command {
        Some(Commands::Tree { manifest, full }) => {
            assert_eq!(manifest, "model.toml");
            assert!(full);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn given_list_command_without_node_when_parsed_then_defaults_to_root_forward() {
    let cli = Cli::try_parse_from(["infotree", "list", "model.toml"]).unwrap();
    match cli.command {
        Some(Commands::List {
            node, backward, ..
        }) => {
            assert_eq!(node, "");
            assert!(!backward);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn given_list_command_with_flags_when_parsed_then_node_and_direction_are_set() {
    let cli = Cli::try_parse_from(["infotree", "list", "m.toml", "-n", "0.1", "-b"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::List { ref node, backward: true, .. }) if node == "0.1"
    ));
}

#[rstest]
#[case("count", AggregateKind::Count)]
#[case("labels", AggregateKind::Labels)]
#[case("sum", AggregateKind::Sum)]
#[case("mean", AggregateKind::Mean)]
#[case("min", AggregateKind::Min)]
#[case("max", AggregateKind::Max)]
fn given_sync_aggregate_name_when_parsed_then_maps_to_kind(
    #[case] name: &str,
    #[case] expected: AggregateKind,
) {
    let cli = Cli::try_parse_from(["infotree", "sync", "m.toml", "-a", name, "--attr", "w"]).unwrap();
    match cli.command {
        Some(Commands::Sync {
            aggregate, attr, ..
        }) => {
            assert_eq!(aggregate, expected);
            assert_eq!(attr.as_deref(), Some("w"));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn given_sync_without_options_when_parsed_then_counts_from_root_without_limit() {
    let cli = Cli::try_parse_from(["infotree", "sync", "m.toml"]).unwrap();
    match cli.command {
        Some(Commands::Sync {
            from,
            aggregate,
            attr,
            limit,
            ..
        }) => {
            assert_eq!(from, "");
            assert_eq!(aggregate, AggregateKind::Count);
            assert_eq!(attr, None);
            assert_eq!(limit, None);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_accepted() {
    let cli = Cli::try_parse_from(["infotree", "info", "m.toml", "-dd", "--config", "~/x.toml"])
        .unwrap();
    assert_eq!(cli.debug, 2);
    assert_eq!(cli.config.as_deref(), Some("~/x.toml"));
}

#[test]
fn given_unknown_aggregate_when_parsed_then_rejected() {
    assert!(Cli::try_parse_from(["infotree", "sync", "m.toml", "-a", "median"]).is_err());
}

#[test]
fn given_no_subcommand_when_parsed_then_command_is_none() {
    let cli = Cli::try_parse_from(["infotree"]).unwrap();
    assert!(cli.command.is_none());
}
