mod app;
mod ui;

use anyhow::{anyhow, Result};
use app::App;
use chrono::{Local, TimeZone};
use deadline_widget::{
    config::{data_dir, AppConfig},
    deadline::SystemClock,
    model::parse_snapshot_detailed,
    refresh::{watcher::ChangeWatcher, NoopSink, RefreshController},
    store::{FileStore, SharedDataStore, DEFAULT_FULL_SCHEDULE, KEY_FULL_SCHEDULE},
    theme::ThemeConfig,
    widget::{timer::TimerFace, ListWidgetAdapter},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    // ── dw --store <path> … ───────────────────────────────────────────────────
    let store_override = match args.iter().position(|a| a == "--store") {
        Some(i) => {
            let path = args.get(i + 1).cloned()
                .ok_or_else(|| anyhow!("--store needs a path"))?;
            args.drain(i..=i + 1);
            Some(PathBuf::from(path))
        }
        None => None,
    };

    let cfg        = AppConfig::load()?;
    let store_path = store_override.unwrap_or_else(|| cfg.store_path());

    match args.first().map(|s| s.as_str()) {
        // ── dw list ───────────────────────────────────────────────────────────
        Some("list") => cmd_list(store_path, cfg),
        // ── dw next ───────────────────────────────────────────────────────────
        Some("next") => cmd_next(store_path, cfg),
        // ── dw (TUI) ──────────────────────────────────────────────────────────
        None => run_tui(store_path, cfg).await,
        Some(other) => Err(anyhow!("unknown command `{other}` (expected `list`, `next` or nothing)")),
    }
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn controller(store_path: PathBuf, cfg: &AppConfig) -> RefreshController<FileStore> {
    RefreshController::new(
        FileStore::new(store_path),
        Arc::new(SystemClock),
        Box::new(NoopSink),
        cfg.refresh.widget_ids.clone(),
    )
}

// ─── List command ─────────────────────────────────────────────────────────────

fn cmd_list(store_path: PathBuf, cfg: AppConfig) -> Result<()> {
    init_stderr_logging();

    let mut c   = controller(store_path, &cfg);
    let summary = c.on_refresh();
    let list    = c.list();

    if list.item_count() == 0 {
        println!("No upcoming deadlines.");
    }
    let snapshot = list.snapshot();
    for i in 0..list.item_count() {
        let row = list.item_at(i);
        let due = snapshot.get(i)
            .and_then(|r| r.deadline_millis)
            .and_then(|ms| Local.timestamp_millis_opt(ms).single())
            .map(|dt| dt.format("%a %b %-d %H:%M").to_string())
            .unwrap_or_else(|| "no deadline".to_owned());
        println!(
            "{:>3}  {:<6} {:<6} {:<30} {:>9}  ({due})",
            list.item_id(i), row.department, row.number, row.title, row.time_label,
        );
    }

    if summary.skipped > 0 {
        // Re-parse for the detail only; the list above already skipped them.
        let raw = c.store().read_string(KEY_FULL_SCHEDULE, DEFAULT_FULL_SCHEDULE);
        if let Ok(report) = parse_snapshot_detailed(&raw) {
            for (idx, why) in report.skipped {
                eprintln!("skipped element {idx}: {why}");
            }
        }
    }
    c.shutdown();
    Ok(())
}

// ─── Next-deadline command ────────────────────────────────────────────────────

fn cmd_next(store_path: PathBuf, cfg: AppConfig) -> Result<()> {
    init_stderr_logging();

    let mut c = controller(store_path, &cfg);
    c.on_refresh();
    let entry = c.timer();

    println!("{}", entry.title);
    if !entry.subject.is_empty() {
        println!("{}", entry.subject);
    }
    match &entry.face {
        TimerFace::Countdown { base_monotonic_millis } => {
            println!("countdown base: {base_monotonic_millis} (monotonic ms)");
        }
        TimerFace::Static(label) => println!("{label}"),
    }
    c.shutdown();
    Ok(())
}

// ─── TUI ─────────────────────────────────────────────────────────────────────

async fn run_tui(store_path: PathBuf, cfg: AppConfig) -> Result<()> {
    let log_dir = data_dir();
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "deadline-widget.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    tracing::info!("Starting deadline widget preview on {}", store_path.display());

    let theme   = ThemeConfig::load().unwrap_or_default();
    let poll    = std::time::Duration::from_secs(cfg.refresh.poll_seconds.max(1));
    let watcher = ChangeWatcher::spawn(store_path.clone(), poll);

    let mut app = App::new(FileStore::new(store_path), cfg.refresh.widget_ids, theme);
    app.attach_watcher(watcher);
    app.run().await?;
    Ok(())
}
