use log::LevelFilter;

/// Environment variable holding the log filter, e.g. `DES_LOG=des_knop=debug`.
pub const LOG_ENV: &str = "DES_LOG";

/// Install an `env_logger` filtered by [`LOG_ENV`], defaulting to
/// `error,des_knop=info`.
///
/// Returns `false` if a logger was already installed.
pub fn init_logger() -> bool {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or(LOG_ENV, "error,des_knop=info"))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_is_idempotent() {
        let _ = init_logger();
        assert!(!init_logger());
    }
}
