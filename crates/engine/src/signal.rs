//! Internal marker for savepoint rollbacks that must not trigger a second
//! physical rollback at the enclosing demarcation level.

use std::fmt;

/// Raised by the savepoint strategy after it has rolled back its savepoint.
///
/// The enclosing new-transaction strategy detects this marker in the error
/// chain, unwraps the original application error, and skips its own physical
/// rollback. The marker never crosses more than one demarcation boundary: it
/// is either resolved there or absorbed by the enclosing unit of work.
#[derive(Debug)]
pub(crate) struct SoftRollbackSignal {
    original: anyhow::Error,
}

impl SoftRollbackSignal {
    pub(crate) fn new(original: anyhow::Error) -> Self {
        SoftRollbackSignal { original }
    }

    /// The application error that caused the savepoint rollback.
    pub(crate) fn into_original(self) -> anyhow::Error {
        self.original
    }
}

impl fmt::Display for SoftRollbackSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nested transaction rolled back to savepoint: {}", self.original)
    }
}

impl std::error::Error for SoftRollbackSignal {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.original.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_recovers_the_original_error() {
        let original = anyhow::anyhow!("insert failed");
        let carried: anyhow::Error = SoftRollbackSignal::new(original).into();
        let signal = carried.downcast::<SoftRollbackSignal>().expect("marker survives");
        assert_eq!(signal.into_original().to_string(), "insert failed");
    }

    #[test]
    fn foreign_errors_do_not_downcast() {
        let plain = anyhow::anyhow!("plain failure");
        assert!(plain.downcast::<SoftRollbackSignal>().is_err());
    }
}
