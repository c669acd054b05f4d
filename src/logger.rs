use std::io::Write;

use env_logger::{Builder, Env};

/// Install the global logger. Defaults to `warn`; `RUST_LOG` overrides.
pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init();
}
