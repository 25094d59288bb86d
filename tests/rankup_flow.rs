//! Integration tests for the progression engine and rankup orchestrator

use ranklift::backend::memory::{
    MemoryEconomy, MemoryPermissions, MemoryStatistics, RecordingSink,
};
use ranklift::backend::{EconomyBackend, MessageKind, PermissionBackend, Statistic};
use ranklift::command::{RankupCommand, RankupSignal};
use ranklift::core::config::ProgressionConfig;
use ranklift::core::types::{CommandSource, RankId};
use ranklift::engine::{ProgressionEngine, UpgradeStatus};
use ranklift::graph::loader::parse_rank_config;
use ranklift::graph::RankGraph;
use ranklift::requirement::registry::RequirementRegistry;
use std::sync::Arc;

const LADDER: &str = r#"
    [[ranks]]
    from = "peasant"
    to = "squire"
    display = "Squire"
    cost = 250.0
    requirements = ["block-break STONE 100"]

    [[ranks]]
    from = "squire"
    to = "knight"
    requirements = ["balance 1000", "level 10"]

    # Two ways out of knight
    [[ranks]]
    from = "knight"
    to = "baron"
    requirements = ["level 20"]

    [[ranks]]
    from = "knight"
    to = "warden"
    requirements = ["level 20"]
"#;

struct Fixture {
    engine: ProgressionEngine,
    permissions: Arc<MemoryPermissions>,
    economy: Arc<MemoryEconomy>,
    stats: Arc<MemoryStatistics>,
    sink: Arc<RecordingSink>,
}

fn fixture(toml: &str, config: ProgressionConfig) -> Fixture {
    let registry = Arc::new(RequirementRegistry::with_builtins());
    let parsed = parse_rank_config(toml, &registry).unwrap();

    let permissions = Arc::new(MemoryPermissions::new());
    for edge in parsed.graph.edges() {
        permissions.define_group(edge.from.as_str());
        permissions.define_group(edge.to.as_str());
    }

    let economy = Arc::new(MemoryEconomy::new());
    let stats = Arc::new(MemoryStatistics::new());
    let sink = Arc::new(RecordingSink::new());

    let engine = ProgressionEngine::new(
        Arc::new(parsed.graph),
        registry,
        permissions.clone(),
        economy.clone(),
        stats.clone(),
        sink.clone(),
        config,
    );

    Fixture {
        engine,
        permissions,
        economy,
        stats,
        sink,
    }
}

fn player() -> CommandSource {
    CommandSource::Player("steve".to_string())
}

/// Test 1: non-player callers are rejected before anything else
#[test]
fn console_caller_gets_player_only() {
    let fx = fixture(LADDER, ProgressionConfig::default());
    let command = RankupCommand::new(&fx.engine, fx.sink.as_ref());

    let signal = command.execute(&CommandSource::Console, None);
    assert_eq!(signal, RankupSignal::PlayerOnly);
    assert!(!signal.is_success());
    assert_eq!(fx.sink.kinds(), vec![MessageKind::PlayerOnly]);
}

/// Test 2: unresolvable primary group is a terminal current-rank error
#[test]
fn missing_primary_group_is_current_rank_error() {
    let fx = fixture(LADDER, ProgressionConfig::default());
    let command = RankupCommand::new(&fx.engine, fx.sink.as_ref());

    let signal = command.execute(&player(), None);
    assert_eq!(signal, RankupSignal::CurrentRankError);
    assert!(!signal.is_success());
}

/// Test 3: zero outgoing edges -> highest-rank signal, no engine mutation
#[test]
fn top_of_ladder_signals_highest_rank() {
    let fx = fixture(LADDER, ProgressionConfig::default());
    fx.permissions.set_primary_group("steve", "baron");
    let command = RankupCommand::new(&fx.engine, fx.sink.as_ref());

    let signal = command.execute(&player(), None);
    assert_eq!(signal, RankupSignal::HighestRank);
    assert!(signal.is_success());
    assert_eq!(fx.permissions.primary_group("steve").unwrap(), "baron");
}

/// Test 4: two outgoing edges and no argument -> show options, no engine call
#[test]
fn ambiguous_target_lists_options() {
    let fx = fixture(LADDER, ProgressionConfig::default());
    fx.permissions.set_primary_group("steve", "knight");
    // Requirements are deliberately met so a wrongly-invoked engine would
    // have swapped the group
    fx.stats.set_level("steve", 30);
    let command = RankupCommand::new(&fx.engine, fx.sink.as_ref());

    let signal = command.execute(&player(), None);
    match signal {
        RankupSignal::ShowOptions(options) => {
            let ids: Vec<&str> = options.iter().map(|(id, _)| id.as_str()).collect();
            assert_eq!(ids, vec!["baron", "warden"]);
        }
        other => panic!("expected ShowOptions, got {other:?}"),
    }
    assert_eq!(fx.permissions.primary_group("steve").unwrap(), "knight");
    assert_eq!(fx.sink.kinds(), vec![MessageKind::RankupOptions]);
}

/// Test 5: explicit argument resolves case-insensitively; no match is invalid
#[test]
fn explicit_argument_resolution() {
    let fx = fixture(LADDER, ProgressionConfig::default());
    fx.permissions.set_primary_group("steve", "knight");
    fx.stats.set_level("steve", 30);
    let command = RankupCommand::new(&fx.engine, fx.sink.as_ref());

    let signal = command.execute(&player(), Some("WARDEN"));
    assert!(matches!(signal, RankupSignal::Success { .. }));
    assert_eq!(fx.permissions.primary_group("steve").unwrap(), "warden");

    fx.permissions.set_primary_group("steve", "knight");
    let signal = command.execute(&player(), Some("emperor"));
    assert_eq!(signal, RankupSignal::InvalidRank("emperor".to_string()));
    assert!(!signal.is_success());
}

/// Test 6: single implicit target evaluates requirements and invokes the
/// engine without disambiguation
#[test]
fn single_edge_rankup_happy_path() {
    let fx = fixture(LADDER, ProgressionConfig::default());
    fx.permissions.set_primary_group("steve", "peasant");
    fx.economy.set_balance("steve", 300.0);
    fx.stats
        .set_statistic("steve", Statistic::BlockBreak, Some("STONE"), 150);
    let command = RankupCommand::new(&fx.engine, fx.sink.as_ref());

    let signal = command.execute(&player(), None);
    match &signal {
        RankupSignal::Success {
            outcome,
            consume_failures,
        } => {
            assert_eq!(outcome.previous_rank, RankId::from("peasant"));
            assert_eq!(outcome.target_rank, RankId::from("squire"));
            assert!(outcome.succeeded);
            assert!(consume_failures.is_empty());
        }
        other => panic!("expected Success, got {other:?}"),
    }
    assert!(signal.is_success());
    assert_eq!(fx.permissions.primary_group("steve").unwrap(), "squire");
    // Cost debited post-commit
    assert_eq!(fx.economy.balance("steve").unwrap(), 50.0);
    assert_eq!(
        fx.sink.kinds(),
        vec![MessageKind::RankupSuccess, MessageKind::RankupBroadcast]
    );
}

/// Test 7: unmet requirements terminate with the complete list
#[test]
fn unmet_requirements_are_all_reported() {
    let fx = fixture(LADDER, ProgressionConfig::default());
    fx.permissions.set_primary_group("steve", "squire");
    // Balance and level both unmet
    fx.economy.set_balance("steve", 10.0);
    fx.stats.set_level("steve", 1);
    let command = RankupCommand::new(&fx.engine, fx.sink.as_ref());

    let signal = command.execute(&player(), None);
    match signal {
        RankupSignal::RequirementsNotMet { target, unmet } => {
            assert_eq!(target, RankId::from("knight"));
            assert_eq!(unmet, vec!["balance: 1000", "level: 10"]);
        }
        other => panic!("expected RequirementsNotMet, got {other:?}"),
    }
    assert_eq!(fx.permissions.primary_group("steve").unwrap(), "squire");
}

/// Test 8: multi-identifier statistics gate on every identifier
#[test]
fn multi_identifier_edge_requires_every_material() {
    let toml = r#"
        [[ranks]]
        from = "a"
        to = "b"
        requirements = ["block-break STONE DIRT 100"]
    "#;
    let fx = fixture(toml, ProgressionConfig::default());
    fx.permissions.set_primary_group("steve", "a");
    fx.stats
        .set_statistic("steve", Statistic::BlockBreak, Some("STONE"), 150);
    fx.stats
        .set_statistic("steve", Statistic::BlockBreak, Some("DIRT"), 50);

    assert!(!fx.engine.can_upgrade_to("steve", &RankId::from("b")));

    fx.stats
        .set_statistic("steve", Statistic::BlockBreak, Some("DIRT"), 150);
    assert!(fx.engine.can_upgrade_to("steve", &RankId::from("b")));
}

/// Test 9: a target group missing from the backend is never upgradable,
/// even with all requirements met
#[test]
fn unknown_backend_group_blocks_upgrade() {
    let registry = Arc::new(RequirementRegistry::with_builtins());
    let parsed = parse_rank_config(
        r#"
        [[ranks]]
        from = "a"
        to = "ghost"
        "#,
        &registry,
    )
    .unwrap();

    let permissions = Arc::new(MemoryPermissions::new());
    permissions.set_primary_group("steve", "a");
    // "ghost" is deliberately not defined in the backend

    let engine = ProgressionEngine::new(
        Arc::new(parsed.graph),
        registry,
        permissions,
        Arc::new(MemoryEconomy::new()),
        Arc::new(MemoryStatistics::new()),
        Arc::new(RecordingSink::new()),
        ProgressionConfig::default(),
    );

    assert!(!engine.can_upgrade_to("steve", &RankId::from("ghost")));
    assert_eq!(
        engine.upgrade_rank("steve", &RankId::from("ghost")),
        UpgradeStatus::NotEligible
    );
}

/// Test 10: rollback restores the original group when the add fails
#[test]
fn failed_add_rolls_back_to_original_group() {
    let fx = fixture(LADDER, ProgressionConfig::default());
    fx.permissions.set_primary_group("steve", "peasant");
    fx.economy.set_balance("steve", 300.0);
    fx.stats
        .set_statistic("steve", Statistic::BlockBreak, Some("STONE"), 150);
    fx.permissions.deny_add_to("squire");

    let status = fx.engine.upgrade_rank("steve", &RankId::from("squire"));
    assert_eq!(status, UpgradeStatus::SwapFailed);
    assert!(!status.succeeded());
    assert_eq!(fx.permissions.primary_group("steve").unwrap(), "peasant");
    // No cost is consumed on a rolled-back swap
    assert_eq!(fx.economy.balance("steve").unwrap(), 300.0);

    // Through the orchestrator the same attempt is a definite failure
    let command = RankupCommand::new(&fx.engine, fx.sink.as_ref());
    let signal = command.execute(&player(), None);
    assert_eq!(
        signal,
        RankupSignal::Failed {
            target: RankId::from("squire")
        }
    );
}

/// Test 11: consume failures after a committed swap are partial success
#[test]
fn consume_failure_is_partial_success() {
    let toml = r#"
        [[ranks]]
        from = "a"
        to = "b"
        cost = 100.0
        requirements = ["balance 100"]
    "#;
    let fx = fixture(toml, ProgressionConfig::default());
    fx.permissions.set_primary_group("steve", "a");
    // Meets both balance checks up front, but the second post-commit
    // withdrawal runs dry
    fx.economy.set_balance("steve", 150.0);

    let status = fx.engine.upgrade_rank("steve", &RankId::from("b"));
    match status {
        UpgradeStatus::Committed { consume_failures } => {
            assert_eq!(consume_failures, vec!["balance: 100"]);
        }
        other => panic!("expected Committed, got {other:?}"),
    }
    // Swap stands despite the failed consume
    assert_eq!(fx.permissions.primary_group("steve").unwrap(), "b");
    assert_eq!(fx.economy.balance("steve").unwrap(), 50.0);
    assert!(fx.sink.kinds().contains(&MessageKind::ConsumeFailed));
}

/// Test 12: the broadcast is gated by configuration
#[test]
fn broadcast_respects_config_flag() {
    let fx = fixture(
        LADDER,
        ProgressionConfig {
            broadcast_rankup: false,
        },
    );
    fx.permissions.set_primary_group("steve", "peasant");
    fx.economy.set_balance("steve", 300.0);
    fx.stats
        .set_statistic("steve", Statistic::BlockBreak, Some("STONE"), 150);
    let command = RankupCommand::new(&fx.engine, fx.sink.as_ref());

    let signal = command.execute(&player(), None);
    assert!(matches!(signal, RankupSignal::Success { .. }));
    let kinds = fx.sink.kinds();
    assert!(kinds.contains(&MessageKind::RankupSuccess));
    assert!(!kinds.contains(&MessageKind::RankupBroadcast));
}

/// Test 13: availability queries are idempotent under unchanged config
#[test]
fn available_ranks_is_idempotent() {
    let fx = fixture(LADDER, ProgressionConfig::default());
    fx.permissions.set_primary_group("steve", "knight");

    let first = fx.engine.available_ranks("steve").unwrap();
    let second = fx.engine.available_ranks("steve").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

/// Test 14: a graph reload swaps the snapshot without disturbing the engine
#[test]
fn reload_swaps_the_graph() {
    let mut fx = fixture(LADDER, ProgressionConfig::default());
    fx.permissions.set_primary_group("steve", "peasant");
    assert_eq!(fx.engine.available_ranks("steve").unwrap().len(), 1);

    // New ladder with no edges out of peasant
    let registry = RequirementRegistry::with_builtins();
    let reloaded = parse_rank_config(
        r#"
        [[ranks]]
        from = "squire"
        to = "knight"
        "#,
        &registry,
    )
    .unwrap();
    fx.engine.reload_graph(Arc::new(reloaded.graph));

    assert!(fx.engine.available_ranks("steve").unwrap().is_empty());
}

/// Test 15: an empty graph means everyone is at the highest rank
#[test]
fn empty_graph_is_always_highest_rank() {
    let registry = Arc::new(RequirementRegistry::with_builtins());
    let permissions = Arc::new(MemoryPermissions::new());
    permissions.set_primary_group("steve", "only");
    let sink = Arc::new(RecordingSink::new());

    let engine = ProgressionEngine::new(
        Arc::new(RankGraph::default()),
        registry,
        permissions,
        Arc::new(MemoryEconomy::new()),
        Arc::new(MemoryStatistics::new()),
        sink.clone(),
        ProgressionConfig::default(),
    );

    let command = RankupCommand::new(&engine, sink.as_ref());
    let signal = command.execute(&player(), None);
    assert_eq!(signal, RankupSignal::HighestRank);
}
