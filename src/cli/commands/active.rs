use crate::cli::commands::{open_pool, wait_for_ticks};
use crate::cli::parser::Commands;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::core::active::{ActiveUsersSnapshot, ActiveUsersView};
use crate::core::refresh::{PresencePoller, spawn_refresh};
use crate::errors::AppResult;
use crate::ui::messages::header;
use std::sync::mpsc;

fn render(snapshot: &ActiveUsersSnapshot) {
    header(format!("Active users: {}", snapshot.count()));
    for line in snapshot.lines() {
        println!("{line}");
    }
    println!();
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Active { watch, ticks } = cmd else {
        return Ok(());
    };

    let pool = open_pool(cfg)?;
    if !*watch {
        render(&ActiveUsersView::new(&pool, SystemClock).snapshot()?);
        return Ok(());
    }

    // The poller owns its own session; the redraw loop only reads snapshots.
    let poller = PresencePoller::spawn(cfg.poll_interval(), move || {
        ActiveUsersView::new(&pool, SystemClock).snapshot()
    })?;
    let reader = poller.reader();

    let (tx, rx) = mpsc::channel();
    let redraw = spawn_refresh("active-redraw", cfg.refresh_interval(), move || {
        if let Some(mut snapshot) = reader.latest() {
            snapshot.refresh(SystemClock.now_ms());
            render(&snapshot);
            let _ = tx.send(());
        }
        Ok(())
    })?;

    wait_for_ticks(&rx, *ticks);
    drop(redraw);
    poller.stop();
    Ok(())
}
