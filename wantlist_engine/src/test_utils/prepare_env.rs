use log::*;

/// Initialise logging (and any `.env.test` overrides) exactly once for a test binary.
pub fn prepare_test_env() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("Logging initialised");
}
