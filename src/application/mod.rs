pub mod order_service;
pub mod product_service;

use crate::domain::context::OperationContext;
use crate::domain::errors::DomainError;
use crate::domain::ports::{Record, Repository};
use crate::domain::reconcile::ChildRecord;

/// Successful outcome of an aggregate operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Written<T> {
    pub value: T,
    pub message: String,
}

impl<T> Written<T> {
    pub fn new(value: T, message: impl Into<String>) -> Self {
        Self {
            value,
            message: message.into(),
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Undo a partially created aggregate: remove the children that did persist,
/// then the root. Returns the error to surface; it always carries `cause`, and
/// also notes a rollback that could not complete.
pub(crate) fn roll_back_creation<P, C, PR, CR>(
    ctx: &OperationContext<'_>,
    parents: &PR,
    children: &CR,
    root: &P,
    created: &[C],
    cause: String,
) -> DomainError
where
    P: Record,
    C: Record,
    PR: Repository<P> + ?Sized,
    CR: Repository<C> + ?Sized,
{
    let mut leftovers = Vec::new();
    for child in created {
        if let Err(e) = children.delete(child.id()) {
            leftovers.push(format!("child {}: {}", child.id(), e.message()));
        }
    }
    if let Err(e) = parents.delete(root.id()) {
        leftovers.push(format!("root {}: {}", root.id(), e.message()));
    }

    match leftovers.first() {
        None => {
            ctx.warn(format_args!("rolled back root {}: {}", root.id(), cause));
            DomainError::Internal(cause)
        }
        Some(first) => {
            ctx.error(format_args!(
                "rollback of root {} incomplete ({} steps failed, first: {}) after: {}",
                root.id(),
                leftovers.len(),
                first,
                cause
            ));
            DomainError::Internal(format!("{}; rollback incomplete: {}", cause, first))
        }
    }
}

/// Deletes every child, attempting all of them. On any failure returns
/// `"<failed> of <total> <label> deletes failed: <first message>"`.
pub(crate) fn delete_children<C, CR>(children: &CR, existing: &[C]) -> Result<(), String>
where
    C: ChildRecord,
    CR: Repository<C> + ?Sized,
{
    let failures: Vec<String> = existing
        .iter()
        .filter_map(|child| children.delete(child.id()).err())
        .map(|e| e.message().to_string())
        .collect();
    match failures.first() {
        None => Ok(()),
        Some(first) => Err(format!(
            "{} of {} {} deletes failed: {}",
            failures.len(),
            existing.len(),
            C::LABEL,
            first
        )),
    }
}

/// Logs a rejection before it is handed back to the caller.
pub(crate) fn log_rejection(ctx: &OperationContext<'_>, action: &str, err: &DomainError) {
    ctx.warn(format_args!("{} rejected: {}", action, err));
}
