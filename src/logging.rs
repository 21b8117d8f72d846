use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a `fern`-backed logger scoped to this crate's own log target.
///
/// Safe to call more than once (and safe to call even if the embedding application already
/// installed its own logger elsewhere) — later calls are silently ignored.
pub fn init(level: log::LevelFilter) {
    INIT.call_once(|| {
        let result = fern::Dispatch::new()
            .level(log::LevelFilter::Off)
            .level_for("arc_crawler", level)
            .format(|out, message, record| {
                out.finish(format_args!("[{}] {}: {}", record.level(), record.target(), message))
            })
            .chain(std::io::stderr())
            .apply();

        if let Err(why) = result {
            eprintln!("arc_crawler: logger already initialized: {}", why);
        }
    });
}
