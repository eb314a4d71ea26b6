use crate::db::log::{LogRow, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;

const OP_WIDTH: usize = 60;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// ANSI colour for an audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "start" | "user_add" => Colour::Green,
        "stop" | "user_remove" | "del" => Colour::Red,
        "force_stop" => Colour::RGB(255, 153, 51),
        "edit" | "user_role" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "export" => Colour::Blue,
        "init" => Colour::Cyan,
        _ => Colour::White,
    }
}

/// `operation (target)`, truncated to the column width, with only the
/// operation word coloured.
fn render_op_target(re: &Regex, row: &LogRow) -> String {
    let color = color_for_operation(&row.operation);
    let visible = if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    };

    let truncated = if visible.chars().count() > OP_WIDTH {
        let mut s: String = visible.chars().take(OP_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    let colored = match truncated.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(truncated.as_str()).to_string(),
    };

    let padding = " ".repeat(OP_WIDTH.saturating_sub(strip_ansi(re, &colored).chars().count()));
    format!("{colored}{padding}")
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let re = Regex::new(r"\x1B\[[0-9;]*[mK]")
            .map_err(|e| crate::errors::AppError::Other(e.to_string()))?;

        let id_w = entries
            .iter()
            .map(|r| r.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|r| r.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");
        for row in &entries {
            println!(
                "{:>id_w$}: {:<date_w$} | {} => {}",
                row.id,
                row.date,
                render_op_target(&re, row),
                row.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
