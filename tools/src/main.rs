//! desk-runner: line-delimited JSON front end for the call desk.
//!
//! Usage:
//!   desk-runner --config desk.json --ipc-mode     (one command per stdin line)
//!   desk-runner --db desk.db                      (print this month's leaderboard)
//!
//! The token secret comes from the config file or CALLDESK_JWT_SECRET.

use anyhow::Result;
use calldesk_core::{
    aggregation::leaderboard,
    command::{DeskCommand, DeskResponse},
    config::DeskConfig,
    service::DeskService,
};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let mut config = match arg_value(&args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::from_env()?,
    };
    if let Some(db) = arg_value(&args, "--db") {
        config.db_path = db.to_string();
    }

    let desk = DeskService::build(config)?;

    if !ipc_mode {
        println!("calldesk desk-runner");
        println!("  db:        {}", desk.config().db_path);
        println!("  token ttl: {}s", desk.config().token_ttl_seconds);
        println!();
    }

    if ipc_mode {
        run_ipc_loop(&desk)?;
    } else {
        print_leaderboard(&desk)?;
    }

    Ok(())
}

fn run_ipc_loop(desk: &DeskService) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }
        if buffer.trim() == "quit" {
            break;
        }

        let response = match serde_json::from_str::<DeskCommand>(&buffer) {
            Ok(cmd) => desk.handle(cmd),
            Err(e) => {
                log::warn!("Unparseable command: {e}");
                DeskResponse {
                    status: 400,
                    body:   serde_json::json!({ "message": e.to_string() }),
                }
            }
        };
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Operator view: current-month totals for every employee, sign-up order.
fn print_leaderboard(desk: &DeskService) -> Result<()> {
    let now = desk.now();
    let users = desk.store.fetch_all()?;
    let rows = leaderboard(&users, now);

    println!("=== MONTHLY TOTALS ({}) ===", now.format("%B %Y"));
    if rows.is_empty() {
        println!("  (No employees registered yet)");
        return Ok(());
    }
    println!(
        "  {:<24} {:<10} {:>6} {:>6} {:>6} {:>6} {:>7} {:>7} {:>6}",
        "name", "employee", "ivr", "dd", "rpcvm", "nv", "total", "dd%", "prod"
    );
    for row in &rows {
        let t = &row.totals;
        println!(
            "  {:<24} {:<10} {:>6} {:>6} {:>6} {:>6} {:>7} {:>6.1}% {:>6.2}",
            row.identity.name,
            row.identity.employee_id,
            t.company_ivr,
            t.direct_dial,
            t.rpc_vm,
            t.not_verified,
            t.grand_total,
            t.percentage,
            t.productivity
        );
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
