use crate::error::GatewayError;

/// Methods that change data on the server.
pub const WRITE_METHODS: [&str; 4] = ["create", "write", "unlink", "copy"];

/// Read-only switch, fixed at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WritePolicy {
    readonly: bool,
}

impl WritePolicy {
    pub fn new(readonly: bool) -> Self {
        Self { readonly }
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_mutating(operation: &str) -> bool {
        WRITE_METHODS.contains(&operation)
    }

    /// Reject `operation` if read-only mode is on and it is a write method.
    ///
    /// Must run before anything is sent to the server.
    pub fn check_allowed(&self, operation: &str) -> Result<(), GatewayError> {
        if self.readonly && Self::is_mutating(operation) {
            return Err(GatewayError::policy(operation));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readonly_blocks_every_write_method() {
        let policy = WritePolicy::new(true);
        for method in WRITE_METHODS {
            let err = policy.check_allowed(method).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!(
                    "Operation '{method}' is not allowed in READONLY_MODE. \
                     Set READONLY_MODE=false to enable write operations."
                )
            );
        }
    }

    #[test]
    fn readonly_allows_reads() {
        let policy = WritePolicy::new(true);
        for method in ["search", "read", "search_read", "fields_get", "name_search"] {
            policy.check_allowed(method).unwrap();
        }
    }

    #[test]
    fn disabled_policy_allows_everything() {
        let policy = WritePolicy::default();
        assert!(!policy.is_readonly());
        for method in WRITE_METHODS {
            policy.check_allowed(method).unwrap();
        }
    }
}
