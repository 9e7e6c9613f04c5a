use chrono::{Datelike, Duration, NaiveDate, Weekday};
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use ketchup_core::interval::format_urgency;
use ketchup_core::models::{Dashboard, SeriesDetail};
use owo_colors::OwoColorize;

/// Days ahead that still get a weekday name instead of a date.
const WEEKDAY_HORIZON_DAYS: i64 = 7;

pub fn display_dashboard(dashboard: &Dashboard) {
    let today = dashboard.today;

    println!("{}", "Overdue".red().bold());
    if dashboard.overdue.is_empty() {
        println!("Nothing overdue.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["ID", "Series", "Task", "Due", "Urgency"]);

        for task in &dashboard.overdue {
            let urgency = task.urgency(today);
            let mut row = Row::new();
            row.add_cell(Cell::new(task.id));
            row.add_cell(Cell::new(task.series_id).fg(Color::DarkGrey));
            row.add_cell(Cell::new(task.title()));
            row.add_cell(Cell::new(format!(
                "{} ({})",
                task.due_date,
                relative(task.due_date, today)
            )));
            row.add_cell(urgency_cell(urgency));
            table.add_row(row);
        }

        println!("{table}");
    }

    println!();
    println!("{}", "Upcoming".bold());
    if dashboard.upcoming.is_empty() {
        println!("Nothing upcoming.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["ID", "Series", "Task", "Due", "Every"]);

        for task in &dashboard.upcoming {
            let mut due_cell = Cell::new(friendly_date(task.due_date, today));
            if task.due_date == today {
                due_cell = due_cell.fg(Color::Yellow);
            }

            let mut row = Row::new();
            row.add_cell(Cell::new(task.id));
            row.add_cell(Cell::new(task.series_id).fg(Color::DarkGrey));
            row.add_cell(Cell::new(task.title()));
            row.add_cell(due_cell);
            row.add_cell(Cell::new(task.interval().describe()));
            table.add_row(row);
        }

        println!("{table}");
    }
}

pub fn display_series(detail: &SeriesDetail, today: NaiveDate) {
    let series = &detail.series;

    println!("{} {}", format!("#{}", series.id).dimmed(), series.title().bold());
    let body: Vec<&str> = series.note.lines().skip(1).collect();
    let body = body.join("\n");
    if !body.trim().is_empty() {
        println!("{}", body.trim());
    }
    println!();
    println!("Every {}", series.interval().describe());

    match &detail.active_task {
        Some(task) => {
            println!(
                "Task {} due {} ({})",
                task.id,
                task.due_date,
                relative(task.due_date, today)
            );
            let urgency = task.effective_interval(series).urgency(task.due_date, today);
            if urgency > 0.0 {
                println!("Urgency {}", format_urgency(urgency).red());
            }
        }
        None => println!("No active task."),
    }

    println!();
    if detail.history.is_empty() {
        println!("No history yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Due", "Completed", "Note"]);
    for entry in &detail.history {
        let mut row = Row::new();
        row.add_cell(Cell::new(entry.id));
        row.add_cell(Cell::new(entry.due_date));
        row.add_cell(Cell::new(entry.completed_at.format("%Y-%m-%d")));
        row.add_cell(match &entry.note {
            Some(note) => Cell::new(note),
            None => Cell::new("-").fg(Color::DarkGrey),
        });
        table.add_row(row);
    }
    println!("{table}");
}

fn urgency_cell(urgency: f64) -> Cell {
    let cell = Cell::new(format_urgency(urgency));
    if urgency >= 1.0 {
        cell.fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        cell.fg(Color::Yellow)
    }
}

/// "Today", "Tomorrow", a weekday name within the next week, else "Mar 1".
pub fn friendly_date(date: NaiveDate, today: NaiveDate) -> String {
    let days = (date - today).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        d if (2..WEEKDAY_HORIZON_DAYS).contains(&d) => weekday_name(date.weekday()).to_string(),
        _ => date.format("%b %-d").to_string(),
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// "3 days ago", "in a week".
pub fn relative(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "today".to_string();
    }
    HumanTime::from(Duration::days((date - today).num_days())).to_string()
}
