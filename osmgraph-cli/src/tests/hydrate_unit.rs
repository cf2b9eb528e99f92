//! Focused unit tests covering hydrate CLI configuration and output.

use super::helpers::{seed_database, seed_relation_chain, utf8_tempdir};
use super::*;
use crate::hydrate::{
    HydrateConfig, MAX_PRINTED_DEPTH, config_from_layers_for_test, hydrate_from_database,
    run_hydrate_with,
};
use camino::Utf8PathBuf;
use osmgraph_core::{Bean, EntityKind, MemberTarget};
use rstest::rstest;
use serde_json::Value;

fn hydrate_args(database: Utf8PathBuf, kind: EntityKind, id: i64) -> HydrateArgs {
    HydrateArgs {
        database: Some(database),
        kind: Some(kind),
        id: Some(id),
    }
}

#[rstest]
#[case::database(None, Some(EntityKind::Way), Some(1), ARG_DATABASE, ENV_HYDRATE_DATABASE)]
#[case::kind(Some(Utf8PathBuf::from("graph.db")), None, Some(1), ARG_KIND, ENV_HYDRATE_KIND)]
#[case::id(
    Some(Utf8PathBuf::from("graph.db")),
    Some(EntityKind::Way),
    None,
    ARG_ID,
    ENV_HYDRATE_ID
)]
fn converting_without_required_fields_errors(
    #[case] database: Option<Utf8PathBuf>,
    #[case] kind: Option<EntityKind>,
    #[case] id: Option<i64>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = HydrateArgs { database, kind, id };
    match HydrateConfig::try_from(args).expect_err("missing field should error") {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn hydrating_a_relation_prints_pretty_json() {
    let (_tmp, root) = utf8_tempdir();
    let database = seed_database(&root);
    let mut stdout = Vec::new();

    run_hydrate_with(hydrate_args(database, EntityKind::Relation, 20), &mut stdout)
        .expect("hydrate relation");

    let text = String::from_utf8(stdout).expect("utf-8 output");
    assert!(text.ends_with("}\n"), "output should end with a newline");
    assert!(text.contains("\n  "), "output should be pretty-printed");
    let value: Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(value["kind"], "relation");
    assert_eq!(value["id"], 20);
    let members = value["members"].as_array().expect("members array");
    assert_eq!(members.len(), 2);
    assert_eq!(members[1]["role"], "platform");
}

#[rstest]
fn hydrated_ways_resolve_their_nodes() {
    let (_tmp, root) = utf8_tempdir();
    let database = seed_database(&root);
    let config = HydrateConfig {
        database,
        kind: EntityKind::Way,
        id: 10,
    };
    let Bean::Way(way) = hydrate_from_database(&config).expect("hydrate way") else {
        panic!("expected a way bean");
    };
    let ids: Vec<_> = way.nodes.iter().flatten().map(|node| node.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[rstest]
fn hydrated_relations_keep_member_order() {
    let (_tmp, root) = utf8_tempdir();
    let database = seed_database(&root);
    let config = HydrateConfig {
        database,
        kind: EntityKind::Relation,
        id: 20,
    };
    let Bean::Relation(relation) = hydrate_from_database(&config).expect("hydrate") else {
        panic!("expected a relation bean");
    };
    assert!(matches!(relation.members[0].target, MemberTarget::Node(_)));
    assert!(matches!(relation.members[1].target, MemberTarget::Way(_)));
}

#[rstest]
#[case(EntityKind::Relation, 404)]
#[case(EntityKind::Node, 10)]
fn absent_roots_are_not_found(#[case] kind: EntityKind, #[case] id: i64) {
    let (_tmp, root) = utf8_tempdir();
    let database = seed_database(&root);
    let mut stdout = Vec::new();

    let err = run_hydrate_with(hydrate_args(database, kind, id), &mut stdout)
        .expect_err("root should be absent");
    match err {
        CliError::NotFound {
            kind: missing_kind,
            id: missing_id,
        } => assert_eq!((missing_kind, missing_id), (kind, id)),
        other => panic!("expected NotFound, found {other:?}"),
    }
    assert!(stdout.is_empty(), "nothing should be printed");
}

#[rstest]
fn over_deep_relation_trees_are_refused_before_printing() {
    let (_tmp, root) = utf8_tempdir();
    let depth = MAX_PRINTED_DEPTH + 1;
    let database = seed_relation_chain(&root, i64::try_from(depth).expect("depth fits"));
    let mut stdout = Vec::new();

    let err = run_hydrate_with(hydrate_args(database, EntityKind::Relation, 1), &mut stdout)
        .expect_err("tree is too deep to print");
    match err {
        CliError::TooDeep {
            depth: found,
            limit,
            ..
        } => assert_eq!((found, limit), (depth, MAX_PRINTED_DEPTH)),
        other => panic!("expected TooDeep, found {other:?}"),
    }
    assert!(stdout.is_empty(), "nothing should be printed");
}

#[rstest]
fn missing_databases_are_reported() {
    let (_tmp, root) = utf8_tempdir();
    let err = run_hydrate_with(
        hydrate_args(root.join("absent.db"), EntityKind::Node, 1),
        &mut Vec::new(),
    )
    .expect_err("database is absent");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_DATABASE),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn negative_ids_parse_from_the_command_line() {
    let cli = Cli::try_parse_from([
        "osmgraph", "hydrate", "--database", "graph.db", "--kind", "node", "--id", "-7",
    ])
    .expect("negative ids are valid OSM ids");
    let Command::Hydrate(args) = cli.command else {
        panic!("expected the hydrate command");
    };
    assert_eq!(args.id, Some(-7));
    assert_eq!(args.kind, Some(EntityKind::Node));
}

#[rstest]
fn unknown_kinds_are_rejected_by_the_parser() {
    let err = Cli::try_parse_from(["osmgraph", "hydrate", "--kind", "area"])
        .expect_err("area is not an entity kind");
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[rstest]
fn log_level_defaults_to_info() {
    let cli = Cli::try_parse_from(["osmgraph", "ingest"]).expect("parse");
    assert_eq!(cli.log_level, LevelFilter::Info);
    let cli = Cli::try_parse_from(["osmgraph", "hydrate", "--log-level", "debug"])
        .expect("parse with level");
    assert_eq!(cli.log_level, LevelFilter::Debug);
}

#[rstest]
fn merge_layers_read_kind_and_id_from_the_environment() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(json!({ "database": "from-file.db", "kind": "node" }), None);
    composer.push_environment(json!({ "kind": "way", "id": 10 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.database, Utf8PathBuf::from("from-file.db"));
    assert_eq!(config.kind, EntityKind::Way);
    assert_eq!(config.id, 10);
}
