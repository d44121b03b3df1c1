//! Pure strategy selection from (propagation, activity).

use crate::strategy::{
    DemarcationStrategy, NewTransaction, PassThrough, PassThroughWithNotify, WrapInSavepoint,
};
use txscope_core::Propagation;

static NEW_TRANSACTION: NewTransaction = NewTransaction;
static WRAP_IN_SAVEPOINT: WrapInSavepoint = WrapInSavepoint;
static PASS_THROUGH: PassThrough = PassThrough;
static PASS_THROUGH_WITH_NOTIFY: PassThroughWithNotify = PassThroughWithNotify;

/// Select the strategy for `propagation` given whether a transaction is
/// already active for the datasource in the current call chain.
///
/// `REQUIRES_NEW` ignores activity: the coordinator has already detached any
/// active context before this level runs, so the new transaction always gets
/// the full new-transaction lifecycle.
pub(crate) fn select(propagation: Propagation, is_active: bool) -> &'static dyn DemarcationStrategy {
    match (propagation, is_active) {
        (Propagation::Required, true) => &PASS_THROUGH,
        (Propagation::Required, false) => &NEW_TRANSACTION,
        (Propagation::Supports, true) => &PASS_THROUGH,
        (Propagation::Supports, false) => &PASS_THROUGH_WITH_NOTIFY,
        (Propagation::Nested, true) => &WRAP_IN_SAVEPOINT,
        (Propagation::Nested, false) => &NEW_TRANSACTION,
        (Propagation::RequiresNew, _) => &NEW_TRANSACTION,
    }
}
