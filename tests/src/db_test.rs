use crate::Setup;

/// Manages the Tokio runtime of one test and makes sure its tables are
/// cleaned up before the test process exits.
pub struct DbTest {
    runtime: tokio::runtime::Runtime,
    setup: Option<Box<dyn Setup>>,
}

impl DbTest {
    pub fn new(setup: Box<dyn Setup>) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime");

        Self {
            runtime,
            setup: Some(setup),
        }
    }

    /// Run a test function with the setup, using our managed runtime.
    pub fn run_test<F>(&mut self, test_fn: F)
    where
        F: for<'a> FnOnce(
            &'a dyn Setup,
        ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + 'a>>,
    {
        let setup = self.setup.as_deref().expect("Setup already consumed");
        self.runtime.block_on(test_fn(setup));
    }
}

impl Drop for DbTest {
    fn drop(&mut self) {
        if let Some(setup) = self.setup.take() {
            self.runtime.block_on(async {
                let _ = setup.cleanup_my_tables().await;
            });
        }
    }
}
