//! Diffing a stored child collection against a desired one.
//!
//! Children are matched by their natural key (the unit or product-unit they
//! describe), never by store id. The plan keeps the store id of every matched
//! child so updates land on the existing row.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use super::errors::DomainError;
use super::ports::{Record, Repository};

/// A child row that can be reconciled against a desired spec.
pub trait ChildRecord: Record {
    type Key: Copy + Ord + fmt::Display;
    type Spec;

    /// Human-readable noun used in outcome messages.
    const LABEL: &'static str;

    fn natural_key(&self) -> Self::Key;
    fn spec_key(spec: &Self::Spec) -> Self::Key;
    /// Overwrite the mutable fields, keeping id, parent id and natural key.
    fn apply_spec(&mut self, spec: &Self::Spec);
    fn new_from_spec(parent_id: i32, spec: &Self::Spec) -> Self::New;
}

/// Create, update and delete sets, each ordered by natural key.
pub struct ChildPlan<C: ChildRecord> {
    pub to_create: Vec<C::New>,
    pub to_update: Vec<C>,
    pub to_delete: Vec<C>,
}

impl<C> fmt::Debug for ChildPlan<C>
where
    C: ChildRecord + fmt::Debug,
    C::New: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildPlan")
            .field("to_create", &self.to_create)
            .field("to_update", &self.to_update)
            .field("to_delete", &self.to_delete)
            .finish()
    }
}

/// Rejects a desired set that names the same natural key twice.
pub fn ensure_unique_keys<C: ChildRecord>(desired: &[C::Spec]) -> Result<(), DomainError> {
    let mut seen: BTreeMap<C::Key, usize> = BTreeMap::new();
    for (index, spec) in desired.iter().enumerate() {
        let key = C::spec_key(spec);
        if let Some(first) = seen.insert(key, index) {
            return Err(DomainError::Validation(format!(
                "duplicate {} key {} at positions {} and {}",
                C::LABEL,
                key,
                first,
                index
            )));
        }
    }
    Ok(())
}

pub fn reconcile<C: ChildRecord>(
    parent_id: i32,
    mut existing: Vec<C>,
    desired: &[C::Spec],
) -> Result<ChildPlan<C>, DomainError> {
    ensure_unique_keys::<C>(desired)?;

    // The lowest id wins a natural key; any other row with that key is surplus.
    existing.sort_by_key(|c| c.id());
    let mut stored: BTreeMap<C::Key, C> = BTreeMap::new();
    let mut surplus = Vec::new();
    for child in existing {
        match stored.entry(child.natural_key()) {
            Entry::Vacant(slot) => {
                slot.insert(child);
            }
            Entry::Occupied(_) => surplus.push(child),
        }
    }

    let mut wanted: BTreeMap<C::Key, &C::Spec> = BTreeMap::new();
    for spec in desired {
        wanted.insert(C::spec_key(spec), spec);
    }

    let mut plan = ChildPlan {
        to_create: Vec::new(),
        to_update: Vec::new(),
        to_delete: Vec::new(),
    };

    for (key, spec) in &wanted {
        match stored.remove(key) {
            Some(mut child) => {
                child.apply_spec(spec);
                plan.to_update.push(child);
            }
            None => plan.to_create.push(C::new_from_spec(parent_id, spec)),
        }
    }
    // Whatever is left in `stored` has no desired counterpart.
    plan.to_delete.extend(stored.into_values());
    plan.to_delete.extend(surplus);
    plan.to_delete.sort_by_key(|c| (c.natural_key(), c.id()));

    Ok(plan)
}

/// Result of applying a plan: what was written, and every failure message.
#[derive(Debug)]
pub struct ApplyReport<C> {
    pub created: Vec<C>,
    pub updated: Vec<C>,
    pub deleted: Vec<C>,
    pub attempted: usize,
    pub failures: Vec<String>,
}

impl<C: ChildRecord> ApplyReport<C> {
    fn new() -> Self {
        ApplyReport {
            created: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
            attempted: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `"<failed> of <attempted> <label> operations failed: <first message>"`,
    /// or `None` when everything succeeded.
    pub fn failure_summary(&self) -> Option<String> {
        let first = self.failures.first()?;
        Some(format!(
            "{} of {} {} operations failed: {}",
            self.failures.len(),
            self.attempted,
            C::LABEL,
            first
        ))
    }

    fn record<T>(&mut self, result: Result<T, DomainError>) -> Option<T> {
        self.attempted += 1;
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.failures.push(e.message().to_string());
                None
            }
        }
    }
}

/// Applies every operation in the plan as an independent store call: creates,
/// then updates, then deletes. A failure never stops the remaining calls.
pub fn apply<C, R>(repo: &R, plan: ChildPlan<C>) -> ApplyReport<C>
where
    C: ChildRecord,
    R: Repository<C> + ?Sized,
{
    let mut report = ApplyReport::new();

    for new in plan.to_create {
        if let Some(created) = report.record(repo.add(new)) {
            report.created.push(created);
        }
    }

    for child in plan.to_update {
        if let Some(updated) = report.record(repo.update(&child)) {
            report.updated.push(updated);
        }
    }

    for child in plan.to_delete {
        let id = child.id();
        let outcome = repo.delete(id).and_then(|removed| {
            removed.ok_or_else(|| {
                DomainError::Internal(format!("{} {} vanished before delete", C::LABEL, id))
            })
        });
        if let Some(removed) = report.record(outcome) {
            report.deleted.push(removed);
        }
    }

    report
}

/// Inserts one child per spec under `parent_id`, each as its own store call.
pub fn create_all<C, R>(repo: &R, parent_id: i32, specs: &[C::Spec]) -> ApplyReport<C>
where
    C: ChildRecord,
    R: Repository<C> + ?Sized,
{
    let plan = ChildPlan {
        to_create: specs
            .iter()
            .map(|spec| C::new_from_spec(parent_id, spec))
            .collect(),
        to_update: Vec::new(),
        to_delete: Vec::new(),
    };
    apply(repo, plan)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    use bigdecimal::BigDecimal;
    use proptest::prelude::*;

    use super::*;
    use crate::domain::product::{NewProductUnitPrice, ProductUnitPrice, UnitPriceSpec};

    fn stored(id: i32, unit_id: i32, price: i64) -> ProductUnitPrice {
        ProductUnitPrice {
            id,
            product_id: 1,
            unit_id,
            special_price: BigDecimal::from(price),
        }
    }

    fn spec(unit_id: i32, price: i64) -> UnitPriceSpec {
        UnitPriceSpec {
            unit_id,
            special_price: BigDecimal::from(price),
        }
    }

    fn keys(plan: &ChildPlan<ProductUnitPrice>) -> (Vec<i32>, Vec<i32>, Vec<i32>) {
        (
            plan.to_create.iter().map(|n| n.unit_id).collect(),
            plan.to_update.iter().map(|c| c.unit_id).collect(),
            plan.to_delete.iter().map(|c| c.unit_id).collect(),
        )
    }

    #[test]
    fn splits_into_create_update_delete() {
        let existing = vec![stored(10, 1, 5), stored(11, 2, 5), stored(12, 3, 5)];
        let desired = vec![spec(2, 6), spec(3, 7), spec(4, 8)];

        let plan = reconcile(1, existing, &desired).expect("reconcile failed");

        assert_eq!(keys(&plan), (vec![4], vec![2, 3], vec![1]));
        assert_eq!(plan.to_update[0].id, 11);
        assert_eq!(plan.to_update[0].special_price, BigDecimal::from(6));
        assert_eq!(plan.to_update[1].id, 12);
        assert_eq!(plan.to_delete[0].id, 10);
        assert_eq!(plan.to_create[0].product_id, 1);
    }

    #[test]
    fn identical_sets_only_refresh() {
        let existing = vec![stored(10, 1, 5), stored(11, 2, 9)];
        let desired = vec![spec(1, 5), spec(2, 9)];

        let plan = reconcile(1, existing.clone(), &desired).expect("reconcile failed");

        assert!(plan.to_create.is_empty());
        assert!(plan.to_delete.is_empty());
        assert_eq!(plan.to_update, existing);
    }

    #[test]
    fn empty_desired_deletes_everything() {
        let plan = reconcile::<ProductUnitPrice>(1, vec![stored(10, 1, 5)], &[])
            .expect("reconcile failed");
        assert_eq!(keys(&plan), (vec![], vec![], vec![1]));
    }

    #[test]
    fn duplicate_desired_key_is_rejected() {
        let desired = [spec(4, 1), spec(5, 1), spec(4, 2)];
        let err = reconcile::<ProductUnitPrice>(1, vec![], &desired).unwrap_err();
        match err {
            DomainError::Validation(msg) => {
                assert!(msg.contains("duplicate unit price key 4"), "{msg}");
                assert!(msg.contains("positions 0 and 2"), "{msg}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn stored_rows_sharing_a_key_are_collapsed() {
        let existing = vec![stored(11, 4, 5), stored(10, 4, 5), stored(12, 6, 5)];

        let plan = reconcile::<ProductUnitPrice>(1, existing.clone(), &[])
            .expect("reconcile failed");
        let ids: Vec<i32> = plan.to_delete.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);

        let desired = [spec(4, 9)];
        let plan = reconcile(1, existing, &desired).expect("reconcile failed");
        assert!(plan.to_create.is_empty());
        assert_eq!(plan.to_update.len(), 1);
        assert_eq!(plan.to_update[0].id, 10);
        assert_eq!(plan.to_update[0].special_price, BigDecimal::from(9));
        let ids: Vec<i32> = plan.to_delete.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![11, 12]);
    }

    proptest! {
        #[test]
        fn result_ignores_input_order(
            existing_keys in proptest::collection::btree_set(1i32..40, 0..12),
            desired_keys in proptest::collection::btree_set(1i32..40, 0..12),
            seed in any::<u64>(),
        ) {
            let existing: Vec<_> = existing_keys
                .iter()
                .map(|&k| stored(k + 100, k, 1))
                .collect();
            let desired: Vec<_> = desired_keys.iter().map(|&k| spec(k, 2)).collect();

            let mut shuffled_existing = existing.clone();
            let mut shuffled_desired = desired.clone();
            let n = seed as usize;
            if !shuffled_existing.is_empty() {
                let len = shuffled_existing.len();
                shuffled_existing.rotate_left(n % len);
                shuffled_existing.reverse();
            }
            if !shuffled_desired.is_empty() {
                let len = shuffled_desired.len();
                shuffled_desired.rotate_right(n % len);
            }

            let a = reconcile(1, existing, &desired).unwrap();
            let b = reconcile(1, shuffled_existing, &shuffled_desired).unwrap();
            prop_assert_eq!(keys(&a), keys(&b));

            let (create, update, delete) = keys(&a);
            let only_desired: Vec<i32> =
                desired_keys.difference(&existing_keys).copied().collect();
            let both: Vec<i32> = desired_keys.intersection(&existing_keys).copied().collect();
            let only_existing: Vec<i32> =
                existing_keys.difference(&desired_keys).copied().collect();
            prop_assert_eq!(create, only_desired);
            prop_assert_eq!(update, both);
            prop_assert_eq!(delete, only_existing);
        }
    }

    /// Store that fails every write touching unit 13.
    struct FlakyStore {
        rows: Mutex<Vec<ProductUnitPrice>>,
    }

    impl Repository<ProductUnitPrice> for FlakyStore {
        fn get_by_id(&self, id: i32) -> Result<Option<ProductUnitPrice>, DomainError> {
            Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
        }

        fn get_all(&self) -> Result<Vec<ProductUnitPrice>, DomainError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        fn add(&self, new: NewProductUnitPrice) -> Result<ProductUnitPrice, DomainError> {
            if new.unit_id == 13 {
                return Err(DomainError::Internal("unit 13 rejected".to_string()));
            }
            let mut rows = self.rows.lock().unwrap();
            let row = ProductUnitPrice {
                id: rows.len() as i32 + 100,
                product_id: new.product_id,
                unit_id: new.unit_id,
                special_price: new.special_price,
            };
            rows.push(row.clone());
            Ok(row)
        }

        fn update(&self, record: &ProductUnitPrice) -> Result<ProductUnitPrice, DomainError> {
            if record.unit_id == 13 {
                return Err(DomainError::Internal("unit 13 rejected".to_string()));
            }
            Ok(record.clone())
        }

        fn delete(&self, id: i32) -> Result<Option<ProductUnitPrice>, DomainError> {
            let mut rows = self.rows.lock().unwrap();
            let pos = rows.iter().position(|r| r.id == id);
            Ok(pos.map(|p| rows.remove(p)))
        }
    }

    #[test]
    fn apply_attempts_every_operation_and_collects_failures() {
        let store = FlakyStore {
            rows: Mutex::new(vec![stored(1, 7, 5)]),
        };
        let existing = store.get_all().unwrap();
        let plan = reconcile(1, existing, &[spec(13, 3), spec(14, 4)]).unwrap();

        let report = apply(&store, plan);

        assert_eq!(report.attempted, 3);
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.deleted.len(), 1);
        assert!(!report.is_success());
        assert_eq!(
            report.failure_summary().as_deref(),
            Some("1 of 3 unit price operations failed: unit 13 rejected")
        );
        let remaining: BTreeSet<i32> = store
            .get_all()
            .unwrap()
            .iter()
            .map(|r| r.unit_id)
            .collect();
        assert_eq!(remaining, BTreeSet::from([14]));
    }

    #[test]
    fn delete_of_missing_row_counts_as_failure() {
        let store = FlakyStore {
            rows: Mutex::new(vec![]),
        };
        let plan = reconcile(1, vec![stored(5, 2, 1)], &[]).unwrap();

        let report = apply(&store, plan);

        assert_eq!(report.failures, vec!["unit price 5 vanished before delete"]);
    }
}
