//! matchwarden - console-log intelligence for multiplayer matches.
//!
//! Tails the game client's console log, feeds each line through the engine,
//! and logs the decisions it produces.

use std::time::Duration;

use chrono::Utc;
use matchwarden::state::{ConsoleLineListener, DelayedBan, Engine, MarkStore};
use matchwarden::tail::LogTailer;
use matchwarden::Config;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use warden_console::{ConsoleEvent, ConsoleLine, PlayerId};

/// Logs notable engine output; a UI front end would register its own
/// listener alongside this one.
struct LogListener;

impl ConsoleLineListener for LogListener {
    fn on_console_line(&mut self, event: &ConsoleEvent) {
        match &event.line {
            ConsoleLine::Chat(chat) => {
                info!(speaker = %chat.speaker, dead = chat.dead, team = chat.team_chat, "chat: {}", chat.text);
            }
            ConsoleLine::Kill(kill) => {
                info!(killer = %kill.killer, victim = %kill.victim, weapon = %kill.weapon, crit = kill.crit, "kill");
            }
            _ => {}
        }
    }

    fn on_ban_confirmed(&mut self, identity: PlayerId, ban: &DelayedBan) {
        info!(player = %identity, name = %ban.name, mark = ban.mark.label(), "ban confirmed");
    }

    fn on_ban_expired(&mut self, ban: &DelayedBan) {
        warn!(name = %ban.name, "ban request expired unresolved");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        log = %config.console.log_path.display(),
        ban_expiry_secs = config.bans.expiry_secs,
        "Starting matchwarden"
    );

    let store = MarkStore::new(&config.marks.path);
    let marks = store.load()?;

    let mut engine = Engine::new(
        chrono::Duration::seconds(config.bans.expiry_secs as i64),
        marks,
    );
    engine.add_listener(Box::new(LogListener));

    let mut tailer = LogTailer::from_end(&config.console.log_path).await?;
    let mut poll = tokio::time::interval(Duration::from_millis(config.console.poll_interval_ms));

    loop {
        tokio::select! {
            _ = poll.tick() => {
                // A transient read failure (rotation race, permission flap)
                // must not take down the session and its mark lists.
                let lines = match tailer.poll().await {
                    Ok(lines) => lines,
                    Err(e) => {
                        warn!(error = %e, "log poll failed, retrying next tick");
                        continue;
                    }
                };
                let now = Utc::now();
                for line in &lines {
                    if let Err(e) = engine.feed_line(line, now) {
                        // A matched grammar with a bad field: skip the line,
                        // keep going.
                        warn!(error = %e, code = e.error_code(), line = %line, "line decode failed");
                    }
                }
                engine.tick(Utc::now());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    store.save(engine.marks())?;
    info!(
        marked = engine.marks().total(),
        parsed = engine.parsed_line_count(),
        "Saved mark lists"
    );
    Ok(())
}
