use chrono::Local;
use env_logger::fmt::Color;
use env_logger::{Builder, Env};
use log::{Level, LevelFilter};
use std::io::Write;

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Cyan,
    }
}

/// `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    Builder::new()
        // hyper and reqwest are chatty at debug level
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .parse_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let mut style = buf.style();
            style
                .set_color(level_color(record.level()))
                .set_bold(record.level() == Level::Error);

            writeln!(
                buf,
                "{} {:<5} [{}:{}] [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                style.value(record.level()),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.target(),
                record.args()
            )
        })
        .init();
}
