mod common;

use courtside::config::settings::BracketSettings;
use courtside::database::{self, DbConn};
use courtside::domain::models::TeamType;
use courtside::errors::CoreError;
use courtside::tournament;

use common::{core_error, empty_database, rng, seeded_league};

fn new_run(conn: &mut DbConn) -> i64 {
    database::runs::create_active_run(conn, "Playoffs 2026", 2026)
        .expect("create run")
        .id
}

/// Hands `winner` four straight series wins.
fn sweep(conn: &mut DbConn, series_id: i64, winner: i64, settings: &BracketSettings) {
    let mut r = rng(99);
    for _ in 0..4 {
        tournament::update_series_result(conn, series_id, winner, settings, &mut r)
            .expect("record win");
    }
}

#[test]
fn bracket_needs_a_full_league() {
    let mut conn = empty_database();
    for i in 0..5 {
        database::teams::insert_team(
            &mut conn,
            &format!("Team {i}"),
            "City",
            &format!("T{i}"),
            Some("East"),
            None,
            TeamType::Franchise,
        )
        .unwrap();
    }
    let run_id = new_run(&mut conn);

    let err = tournament::create_bracket(
        &mut conn,
        run_id,
        &BracketSettings::default(),
        &mut rng(1),
    )
    .unwrap_err();
    assert!(matches!(core_error(&err), CoreError::Precondition(_)));
    assert!(database::series::list_by_run(&mut conn, run_id)
        .unwrap()
        .is_empty());
}

#[test]
fn round_one_pairs_within_conferences() {
    let mut conn = seeded_league(2);
    let run_id = new_run(&mut conn);
    let settings = BracketSettings::default();

    let series = tournament::create_bracket(&mut conn, run_id, &settings, &mut rng(2)).unwrap();
    assert_eq!(series.len(), 16);

    let east = series
        .iter()
        .filter(|s| s.conference.as_deref() == Some("East"))
        .count();
    assert_eq!(east, 8);

    // No team appears twice, every matchup stays inside its conference.
    let mut seen = std::collections::HashSet::new();
    for s in &series {
        assert!(seen.insert(s.team1_id), "team {} paired twice", s.team1_id);
        assert!(seen.insert(s.team2_id), "team {} paired twice", s.team2_id);
        let t1 = database::teams::find_by_id(&mut conn, s.team1_id).unwrap().unwrap();
        let t2 = database::teams::find_by_id(&mut conn, s.team2_id).unwrap().unwrap();
        assert_eq!(t1.conference, t2.conference);
        assert_eq!(t1.conference.as_deref(), s.conference.as_deref());
    }
    assert_eq!(seen.len(), 32);
}

#[test]
fn creating_a_second_bracket_is_rejected() {
    let mut conn = seeded_league(3);
    let run_id = new_run(&mut conn);
    let settings = BracketSettings::default();

    tournament::create_bracket(&mut conn, run_id, &settings, &mut rng(3)).unwrap();
    let err = tournament::create_bracket(&mut conn, run_id, &settings, &mut rng(4)).unwrap_err();
    assert!(matches!(core_error(&err), CoreError::InvalidTransition(_)));
}

#[test]
fn series_completes_at_four_wins_and_rejects_a_fifth() {
    let mut conn = seeded_league(4);
    let run_id = new_run(&mut conn);
    let settings = BracketSettings::default();

    let series = tournament::create_bracket(&mut conn, run_id, &settings, &mut rng(4)).unwrap();
    let target = &series[0];

    let mut r = rng(10);
    for i in 1..=3 {
        let update =
            tournament::update_series_result(&mut conn, target.id, target.team1_id, &settings, &mut r)
                .unwrap();
        assert_eq!(update.series.team1_wins, i);
        assert!(!update.series.is_completed);
    }
    let update =
        tournament::update_series_result(&mut conn, target.id, target.team1_id, &settings, &mut r)
            .unwrap();
    assert!(update.series.is_completed);
    assert_eq!(update.series.winner_team_id, Some(target.team1_id));

    let err =
        tournament::update_series_result(&mut conn, target.id, target.team1_id, &settings, &mut r)
            .unwrap_err();
    assert!(matches!(core_error(&err), CoreError::InvalidTransition(_)));
}

#[test]
fn win_for_a_team_outside_the_series_is_rejected() {
    let mut conn = seeded_league(5);
    let run_id = new_run(&mut conn);
    let settings = BracketSettings::default();

    let series = tournament::create_bracket(&mut conn, run_id, &settings, &mut rng(5)).unwrap();
    let outsider = series[1].team1_id;

    let err =
        tournament::update_series_result(&mut conn, series[0].id, outsider, &settings, &mut rng(5))
            .unwrap_err();
    assert!(matches!(core_error(&err), CoreError::InvalidTransition(_)));

    let err = tournament::update_series_result(&mut conn, 9999, outsider, &settings, &mut rng(5))
        .unwrap_err();
    assert!(matches!(core_error(&err), CoreError::NotFound(_)));
}

#[test]
fn completed_round_advances_to_the_next() {
    let mut conn = seeded_league(6);
    let run_id = new_run(&mut conn);
    let settings = BracketSettings::default();

    let series = tournament::create_bracket(&mut conn, run_id, &settings, &mut rng(6)).unwrap();
    for s in &series {
        assert!(database::series::list_by_round(&mut conn, run_id, 2)
            .unwrap()
            .is_empty());
        sweep(&mut conn, s.id, s.team1_id, &settings);
    }

    let round2 = database::series::list_by_round(&mut conn, run_id, 2).unwrap();
    assert_eq!(round2.len(), 8);

    let winners: std::collections::HashSet<i64> =
        series.iter().map(|s| s.team1_id).collect();
    let mut paired = std::collections::HashSet::new();
    for s in &round2 {
        assert_eq!(s.team1_wins, 0);
        assert_eq!(s.team2_wins, 0);
        assert!(!s.is_completed);
        assert!(s.conference.is_some());
        // Round 2 draws only round-1 winners, each exactly once.
        assert!(winners.contains(&s.team1_id));
        assert!(winners.contains(&s.team2_id));
        assert!(paired.insert(s.team1_id));
        assert!(paired.insert(s.team2_id));
    }
    assert_eq!(paired.len(), 16);

    // Re-running the advance is a no-op, not a duplicate round.
    let outcome =
        tournament::check_and_advance(&mut conn, run_id, 1, &settings, &mut rng(7)).unwrap();
    assert!(outcome.created.is_empty());
    assert_eq!(
        database::series::list_by_round(&mut conn, run_id, 2).unwrap().len(),
        8
    );
}

#[test]
fn full_tournament_crowns_a_champion_and_completes_the_run() {
    let mut conn = seeded_league(7);
    let run_id = new_run(&mut conn);
    let settings = BracketSettings::default();

    tournament::create_bracket(&mut conn, run_id, &settings, &mut rng(7)).unwrap();

    let mut champion = None;
    for round in 1..=5 {
        let series = database::series::list_by_round(&mut conn, run_id, round).unwrap();
        let expected = match round {
            1 => 16,
            2 => 8,
            3 => 4,
            4 => 2,
            _ => 1,
        };
        assert_eq!(series.len(), expected, "round {round}");
        if round == 5 {
            assert!(series[0].conference.is_none(), "finals carry no conference");
        }
        let mut r = rng(100 + round as u64);
        for s in &series {
            for _ in 0..4 {
                let update = tournament::update_series_result(
                    &mut conn,
                    s.id,
                    s.team1_id,
                    &settings,
                    &mut r,
                )
                .unwrap();
                champion = champion.or(update.champion_team_id);
            }
        }
    }

    let champion = champion.expect("finals produced a champion");
    let run = database::runs::find_by_id(&mut conn, run_id).unwrap().unwrap();
    assert!(run.is_completed);
    assert_eq!(run.champion_team_id, Some(champion));
}

#[test]
fn reset_wipes_bracket_state_but_keeps_the_league() {
    let mut conn = seeded_league(8);
    let run_id = new_run(&mut conn);
    let settings = BracketSettings::default();

    let series = tournament::create_bracket(&mut conn, run_id, &settings, &mut rng(8)).unwrap();
    sweep(&mut conn, series[0].id, series[0].team1_id, &settings);

    let summary = tournament::reset_tournament(&mut conn, run_id).unwrap();
    assert_eq!(summary.series_deleted, 16);

    assert!(database::series::list_by_run(&mut conn, run_id).unwrap().is_empty());
    assert_eq!(database::teams::list_franchises(&mut conn).unwrap().len(), 32);
    assert!(database::runs::find_by_id(&mut conn, run_id).unwrap().is_some());

    // A fresh bracket can be created after the reset.
    let recreated = tournament::create_bracket(&mut conn, run_id, &settings, &mut rng(9)).unwrap();
    assert_eq!(recreated.len(), 16);
}

#[test]
fn only_one_run_is_active_at_a_time() {
    let mut conn = seeded_league(9);
    let first = new_run(&mut conn);
    let second = database::runs::create_active_run(&mut conn, "Playoffs 2027", 2027)
        .unwrap()
        .id;

    let active = database::runs::find_active(&mut conn).unwrap().unwrap();
    assert_eq!(active.id, second);

    database::runs::activate(&mut conn, first).unwrap();
    let active = database::runs::find_active(&mut conn).unwrap().unwrap();
    assert_eq!(active.id, first);
}
