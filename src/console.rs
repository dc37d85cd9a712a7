//! Colorful console output for solve runs.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::domain::RosterProblem;
use crate::model::{ConstraintKind, Model};
use crate::solver::{SolveResult, SolveStatus};

/// ASCII art banner for server startup.
pub fn print_banner() {
    let banner = r#"
  ____  _     _  __ _     ____            _
 / ___|| |__ (_)/ _| |_  |  _ \ ___  ___| |_ ___ _ __
 \___ \| '_ \| | |_| __| | |_) / _ \/ __| __/ _ \ '__|
  ___) | | | | |  _| |_  |  _ < (_) \__ \ ||  __/ |
 |____/|_| |_|_|_|  \__| |_| \_\___/|___/\__\___|_|
"#;
    println!("{}", banner.cyan().bold());
    println!(
        "  {} {}\n",
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black(),
        "Shift Rostering".bright_cyan()
    );
}

/// Prints problem and model sizes.
pub fn print_problem(problem: &RosterProblem, model: &Model) {
    let headcount: i64 = problem.shifts.iter().map(|s| s.required).sum();
    println!(
        "{} {} {} Problem: shifts ({}), employees ({}), headcount ({}), pins ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        problem.shifts.len().to_formatted_string(&Locale::en).bright_yellow(),
        problem.employees.len().to_formatted_string(&Locale::en).bright_yellow(),
        headcount.to_formatted_string(&Locale::en).bright_yellow(),
        problem.pins.len().to_formatted_string(&Locale::en).bright_yellow()
    );

    let conflicts = model.count(ConstraintKind::NoOverlap) + model.count(ConstraintKind::Rest);
    println!(
        "{} {} {} Model: decisions ({}), rows ({}), conflict rows ({}), consecutive terms ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        model.num_decisions().to_formatted_string(&Locale::en).bright_yellow(),
        model.constraints.len().to_formatted_string(&Locale::en).bright_yellow(),
        conflicts.to_formatted_string(&Locale::en).bright_yellow(),
        model.objective.consecutive.len().to_formatted_string(&Locale::en).bright_magenta()
    );
}

/// Prints solver completion summary.
pub fn print_solving_ended(result: &SolveResult) {
    let stats = &result.statistics;

    println!(
        "{} {} {} Solving ended: time spent ({}), objective ({}), variables ({}), rows ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        format_duration(result.duration).yellow(),
        format_objective(result.objective),
        stats.variables().to_formatted_string(&Locale::en).bright_magenta().bold(),
        stats.rows.to_formatted_string(&Locale::en).white()
    );

    // Summary box (60 chars wide, 56 char content area)
    println!();
    println!("{}", "╔══════════════════════════════════════════════════════════╗".bright_cyan());

    let status_text = match result.status {
        SolveStatus::Optimal => "✓ OPTIMAL ROSTER",
        SolveStatus::Feasible => "✓ FEASIBLE ROSTER (optimality not proven)",
        SolveStatus::Infeasible => "✗ INFEASIBLE (hard rules cannot be met)",
        SolveStatus::Unknown => "? UNKNOWN (budget spent, no roster)",
    };
    let status_colored = match result.status {
        SolveStatus::Optimal => status_text.bright_green().bold().to_string(),
        SolveStatus::Feasible => status_text.green().bold().to_string(),
        SolveStatus::Infeasible => status_text.bright_red().bold().to_string(),
        SolveStatus::Unknown => status_text.yellow().bold().to_string(),
    };
    let status_padding = 56usize.saturating_sub(status_text.chars().count());
    let left_pad = status_padding / 2;
    let right_pad = status_padding - left_pad;
    println!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    );

    println!("{}", "╠══════════════════════════════════════════════════════════╣".bright_cyan());

    let objective_str = result
        .objective
        .map(|o| o.to_formatted_string(&Locale::en))
        .unwrap_or_else(|| "-".to_string());
    print_row("Objective:", &objective_str);
    print_row("Assignments:", &result.assignments.len().to_formatted_string(&Locale::en));
    print_row("Solving Time:", &format!("{:.2}s", result.duration.as_secs_f64()));
    print_row("Engine Time:", &format!("{:.2}s", stats.time_total.as_secs_f64()));

    println!("{}", "╚══════════════════════════════════════════════════════════╝".bright_cyan());
    println!();
}

fn print_row(label: &str, value: &str) {
    println!(
        "{}  {:<18}{:>36}  {}",
        "║".bright_cyan(),
        label,
        value,
        "║".bright_cyan()
    );
}

/// Formats a duration nicely.
fn format_duration(d: Duration) -> String {
    let total_ms = d.as_millis();
    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        let mins = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

fn format_objective(objective: Option<i64>) -> String {
    match objective {
        Some(o) => o.to_formatted_string(&Locale::en).bright_green().to_string(),
        None => "none".bright_red().to_string(),
    }
}

/// Returns a timestamp string.
fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| format!("{}.{:03}", d.as_secs(), d.subsec_millis()))
        .unwrap_or_else(|_| "0.000".to_string())
}
