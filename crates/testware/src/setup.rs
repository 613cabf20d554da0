use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Test-wide initialisation, safe to call from every test.
pub struct TestSetup;

impl TestSetup {
    pub fn init() {
        static INIT: OnceLock<()> = OnceLock::new();

        INIT.get_or_init(|| {
            Self::init_logging();
            tracing::debug!("Test logging ready");
        });
    }

    fn init_logging() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    }
}
