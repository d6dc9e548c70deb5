//! Report tests: per-user window totals and the monthly leaderboard,
//! driven through the service with a pinned clock.

use calldesk_core::{
    clock::FixedClock,
    command::DeskCommand,
    record::{CallRecord, Outcome},
    service::{DeskService, SignupRequest},
};
use chrono::{Duration, NaiveDateTime};
use serde_json::json;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Sign up and log in; returns the bearer token.
fn enrol(desk: &DeskService, name: &str, employee_id: &str) -> String {
    desk.signup(&SignupRequest {
        name: name.into(),
        employee_id: employee_id.into(),
        password: "pw".into(),
        dob: "1990-01-01".into(),
    })
    .expect("signup");
    desk.login(employee_id, "pw").expect("login").token
}

fn counts(date: NaiveDateTime, ivr: u64, dd: u64, rpc: u64, nv: u64) -> CallRecord {
    CallRecord::at(date)
        .with(Outcome::CompanyIvr, ivr)
        .with(Outcome::DirectDial, dd)
        .with(Outcome::RpcVm, rpc)
        .with(Outcome::NotVerified, nv)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Today's record counts toward every window; one from 40 days ago toward none.
#[test]
fn totals_for_today_week_and_month() {
    // Monday.
    let now = at("2026-10-19 17:30:00");
    let desk = DeskService::build_test(now).unwrap();
    let token = enrol(&desk, "Ana", "E-1");

    desk.add_record(Some(&token), &counts(at("2026-10-19 09:00:00"), 2, 3, 1, 0))
        .unwrap();
    desk.add_record(
        Some(&token),
        &CallRecord::at(now - Duration::days(40)).with(Outcome::DirectDial, 10),
    )
    .unwrap();

    let t = desk.totals(Some(&token)).unwrap();

    assert_eq!(t.today.grand_total, 6);
    assert!((t.today.percentage - 50.0).abs() < 1e-9);
    assert!((t.today.productivity - 4.0 / 6.0).abs() < 1e-9);
    assert_eq!(t.week, t.today);
    assert_eq!(t.month.grand_total, 6);
    assert_eq!(t.month.direct_dial, 3);
}

/// Sunday's record is in this week; Saturday's is in last week.
#[test]
fn week_boundary_is_sunday_midnight() {
    let now = at("2026-10-21 12:00:00"); // Wednesday
    let desk = DeskService::build_test(now).unwrap();
    let token = enrol(&desk, "Ana", "E-1");

    desk.add_record(Some(&token), &counts(at("2026-10-17 23:59:59"), 0, 5, 0, 0))
        .unwrap();
    desk.add_record(Some(&token), &counts(at("2026-10-18 00:00:00"), 0, 7, 0, 0))
        .unwrap();

    let t = desk.totals(Some(&token)).unwrap();

    assert_eq!(t.today.grand_total, 0);
    assert_eq!(t.week.direct_dial, 7);
    assert_eq!(t.month.direct_dial, 12);
}

/// Later-in-the-month records count toward month but not today/week.
#[test]
fn month_window_reaches_the_end_of_the_month() {
    let now = at("2026-10-05 08:00:00");
    let mut desk = DeskService::build_test(now).unwrap();
    let token = enrol(&desk, "Ana", "E-1");

    desk.add_record(Some(&token), &counts(at("2026-10-31 23:59:59"), 1, 0, 0, 0))
        .unwrap();
    desk.add_record(Some(&token), &counts(at("2026-11-01 00:00:00"), 1, 0, 0, 0))
        .unwrap();

    let t = desk.totals(Some(&token)).unwrap();
    assert_eq!(t.week.grand_total, 0);
    assert_eq!(t.month.grand_total, 1);

    desk.set_clock(Box::new(FixedClock::new(at("2026-11-01 00:00:00"))));
    let t = desk.totals(Some(&token)).unwrap();
    assert_eq!(t.today.grand_total, 1);
    assert_eq!(t.month.grand_total, 1);
}

#[test]
fn user_without_records_gets_zero_totals() {
    let desk = DeskService::build_test(at("2026-10-19 10:00:00")).unwrap();
    let token = enrol(&desk, "Ana", "E-1");

    let t = desk.totals(Some(&token)).unwrap();

    for w in [t.today, t.week, t.month] {
        assert_eq!(w.grand_total, 0);
        assert_eq!(w.percentage, 0.0);
        assert_eq!(w.productivity, 0.0);
    }
}

/// One employee idle this month must not affect another's row.
/// A counter SQLite cannot hold fails the request instead of being stored
/// as some other number.
#[test]
fn unstorable_counter_fails_the_request() {
    let now = at("2026-10-19 17:30:00");
    let desk = DeskService::build_test(now).unwrap();
    let token = enrol(&desk, "Ana", "E-1");
    let record = CallRecord::at(at("2026-10-19 09:00:00")).with(Outcome::DirectDial, u64::MAX);

    let err = desk.add_record(Some(&token), &record).unwrap_err();

    assert_eq!(err.status(), 500);
    assert!(desk.get_records(Some(&token)).unwrap().is_empty());
    assert_eq!(desk.totals(Some(&token)).unwrap().today.grand_total, 0);
}

#[test]
fn leaderboard_rows_are_independent_and_unsorted() {
    let desk = DeskService::build_test(at("2026-10-19 10:00:00")).unwrap();
    let idle = enrol(&desk, "Idle", "E-1");
    let busy = enrol(&desk, "Busy", "E-2");

    desk.add_record(Some(&idle), &counts(at("2026-09-28 10:00:00"), 9, 9, 9, 9))
        .unwrap();
    desk.add_record(Some(&busy), &counts(at("2026-10-01 00:00:00"), 1, 2, 1, 0))
        .unwrap();
    desk.add_record(Some(&busy), &counts(at("2026-10-18 16:00:00"), 0, 2, 0, 2))
        .unwrap();

    let rows = desk.monthly_totals(Some(&busy)).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].identity.name, "Idle");
    assert_eq!(rows[0].totals.grand_total, 0);
    assert_eq!(rows[0].totals.percentage, 0.0);
    assert_eq!(rows[1].identity.name, "Busy");
    assert_eq!(rows[1].totals.grand_total, 8);
    assert!((rows[1].totals.percentage - 50.0).abs() < 1e-9);
    assert!((rows[1].totals.productivity - 5.0 / 8.0).abs() < 1e-9);
    assert_eq!(desk.store.event_count("leaderboard_computed").unwrap(), 1);
}

/// The command surface speaks the JSON shapes clients already consume.
#[test]
fn commands_round_trip_through_json() {
    let desk = DeskService::build_test(at("2026-10-19 10:00:00")).unwrap();

    let signup: DeskCommand = serde_json::from_value(json!({
        "cmd": "signup", "name": "Ana", "employeeID": "E-1",
        "password": "pw", "dob": "1990-01-01"
    }))
    .unwrap();
    assert_eq!(desk.handle(signup).status, 201);

    let login: DeskCommand =
        serde_json::from_value(json!({ "cmd": "login", "employeeID": "E-1", "password": "pw" }))
            .unwrap();
    let resp = desk.handle(login);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["name"], "Ana");
    let token = resp.body["token"].as_str().unwrap().to_string();

    let add: DeskCommand = serde_json::from_value(json!({
        "cmd": "add_record", "token": token,
        "record": { "date": "2026-10-19T09:00:00", "fileName": "a.csv",
                    "companyIVR": 2, "rpcVM": 1, "notVerified": 1 }
    }))
    .unwrap();
    assert_eq!(desk.handle(add).status, 201);

    let totals = desk.handle(DeskCommand::Totals { token: Some(token.clone()) });
    assert_eq!(totals.status, 200);
    assert_eq!(totals.body["today"]["directDial"], 0);
    assert_eq!(totals.body["today"]["grandTotal"], 4);
    assert_eq!(totals.body["month"]["productivity"], 0.25);

    let board = desk.handle(DeskCommand::MonthlyTotals { token: Some(token) });
    assert_eq!(board.body[0]["employeeID"], "E-1");
    assert_eq!(board.body[0]["rpcVM"], 1);

    let denied = desk.handle(DeskCommand::GetRecords { token: None });
    assert_eq!(denied.status, 401);
    assert!(denied.body["message"].is_string());
}
