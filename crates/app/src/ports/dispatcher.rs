//! Trigger dispatcher port: how producers hand board events to automation.

use std::future::Future;
use std::sync::Arc;

use cardflow_domain::automation::TriggerEvent;

/// Runs automation for a board event.
///
/// Infallible by contract: automation outcomes are only observable through
/// the audit log and operational logging, never through the caller.
pub trait TriggerDispatcher {
    fn process_trigger(&self, event: &TriggerEvent) -> impl Future<Output = ()> + Send;
}

impl<T: TriggerDispatcher + Send + Sync> TriggerDispatcher for Arc<T> {
    fn process_trigger(&self, event: &TriggerEvent) -> impl Future<Output = ()> + Send {
        (**self).process_trigger(event)
    }
}
