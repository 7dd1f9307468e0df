use std::sync::atomic::{AtomicU32, Ordering};

/// Generates unique table prefixes for test isolation.
///
/// Each test gets a prefix of the form `t{process_id}_{test_counter}_` so
/// tests running in parallel, within or across processes, never touch each
/// other's tables. Prefixes stay short and lowercase to remain valid table
/// names on every backend.
#[derive(Clone)]
#[allow(dead_code)] // Only used when server database features are enabled
pub struct TestIsolation {
    process_id: u32,
    test_counter: u32,
}

#[allow(dead_code)] // Only used when server database features are enabled
static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

#[allow(dead_code)] // Only used when server database features are enabled
impl TestIsolation {
    pub fn new() -> Self {
        Self {
            process_id: std::process::id(),
            test_counter: TEST_COUNTER.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn table_prefix(&self) -> String {
        format!("t{}_{}_", self.process_id, self.test_counter)
    }

    pub fn owns_table(&self, table_name: &str) -> bool {
        table_name.starts_with(&self.table_prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_unique() {
        let a = TestIsolation::new();
        let b = TestIsolation::new();

        assert_ne!(a.table_prefix(), b.table_prefix());
        assert!(a.owns_table(&format!("{}app_1", a.table_prefix())));
        assert!(!b.owns_table(&format!("{}app_1", a.table_prefix())));
    }

    #[test]
    fn prefixes_are_valid_table_names() {
        let prefix = TestIsolation::new().table_prefix();
        let name = format!("{prefix}app_1");

        assert!(name.len() <= 63);
        assert!(dyntable_core::stmt::Name::parse(&name).is_ok());
    }
}
