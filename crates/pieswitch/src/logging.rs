use env_logger::{Env, Target};
use piekit::instance::InstanceIdentity;
use std::io::Write;

/// Logs go to the instance's events log, since the daemon usually has no terminal. Stderr is
/// used only when that file cannot be opened.
pub fn init(identity: &InstanceIdentity) {
    let instance = identity.name.to_string();
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(move |buf, record| {
        writeln!(
            buf,
            "{} instance={} {} {}",
            buf.timestamp_millis(),
            instance,
            record.level(),
            record.args()
        )
    });

    let log_path = identity.events_log();
    let opened = fs_err::create_dir_all(identity.run_dir()).and_then(|()| {
        fs_err::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
    });
    let fallback = match opened {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file.into_parts().0)));
            None
        }
        Err(e) => Some(e),
    };

    if builder.try_init().is_err() {
        return;
    }
    if let Some(e) = fallback {
        log::warn!("events log unavailable, using stderr: {}", e);
    }
}
