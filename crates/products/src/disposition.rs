//! Product disposition: what happens to a product's stock during an order pass.
//!
//! Every procedure here is a pure function from a snapshot (and the reference
//! instant) to a [`Decision`]: the outcome plus the ordered side effects the
//! caller must perform. Nothing is persisted or sent from this module.
//!
//! Each procedure emits at most one `Persist` effect (a full-record write) and
//! at most one `Notify` effect.

use chrono::{DateTime, Utc};
use thiserror::Error;

use stockflow_core::{DomainError, ProductId};
use stockflow_notifications::Notification;

use crate::product::{Product, ProductCategory};
use crate::temporal::{is_expired, is_in_season, will_delay_exceed_season};

/// Outcome of a disposition, reported back to the order pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// One unit taken from stock.
    Fulfilled { remaining: u32 },
    /// Lead time recorded and a delay notification sent.
    Delayed { lead_time_days: u32 },
    /// Restock would arrive after the season ends; stock zeroed.
    SeasonOverrun,
    /// Not in season; out-of-stock notification sent, record rewritten as-is.
    OutOfSeason,
    /// Product expired (or has no sellable stock); stock zeroed.
    Expired,
    /// No stock and no known lead time; nothing happens.
    Unfulfilled,
    /// Category has no decision procedure; nothing happens.
    UnhandledCategory { tag: String },
}

/// A side effect to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Full-record overwrite of the product, keyed by id.
    Persist(Product),
    Notify(Notification),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub disposition: Disposition,
    pub effects: Vec<Effect>,
}

impl Decision {
    fn new(disposition: Disposition, effects: Vec<Effect>) -> Self {
        Self { disposition, effects }
    }

    /// The record written by this decision, if any.
    pub fn persisted(&self) -> Option<&Product> {
        self.effects.iter().find_map(|e| match e {
            Effect::Persist(p) => Some(p),
            Effect::Notify(_) => None,
        })
    }

    /// The notification sent by this decision, if any.
    pub fn notification(&self) -> Option<&Notification> {
        self.effects.iter().find_map(|e| match e {
            Effect::Notify(n) => Some(n),
            Effect::Persist(_) => None,
        })
    }

    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispositionError {
    /// The expiration branch needs an expiry date to put in the notification.
    #[error("product {product_id} ('{name}') reached expiration handling without an expiry date")]
    MissingExpiryDate { product_id: ProductId, name: String },
}

impl From<DispositionError> for DomainError {
    fn from(value: DispositionError) -> Self {
        DomainError::invariant(value.to_string())
    }
}

/// Dispatch on the product category.
pub fn process_product(p: &Product, now: DateTime<Utc>) -> Result<Decision, DispositionError> {
    match &p.category {
        ProductCategory::Normal => Ok(process_normal_product(p)),
        ProductCategory::Seasonal => Ok(process_seasonal_product(p, now)),
        ProductCategory::Expirable => process_expirable_product(p, now),
        ProductCategory::Unrecognized(tag) => Ok(Decision::new(
            Disposition::UnhandledCategory { tag: tag.clone() },
            vec![],
        )),
    }
}

/// Record `lead_time` on the product, then announce the delay.
pub fn notify_delay(lead_time: u32, p: &Product) -> Decision {
    let mut next = p.clone();
    next.lead_time = lead_time;

    Decision::new(
        Disposition::Delayed {
            lead_time_days: lead_time,
        },
        vec![
            Effect::Persist(next),
            Effect::Notify(Notification::delay(lead_time, p.name.clone())),
        ],
    )
}

fn fulfil(p: &Product) -> Decision {
    let next = p.decremented();
    Decision::new(
        Disposition::Fulfilled {
            remaining: next.available,
        },
        vec![Effect::Persist(next)],
    )
}

pub fn process_normal_product(p: &Product) -> Decision {
    if p.in_stock() {
        return fulfil(p);
    }

    if p.lead_time > 0 {
        return notify_delay(p.lead_time, p);
    }

    Decision::new(Disposition::Unfulfilled, vec![])
}

pub fn process_seasonal_product(p: &Product, now: DateTime<Utc>) -> Decision {
    if is_in_season(p, now) && p.in_stock() {
        return fulfil(p);
    }

    handle_seasonal_product(p, now)
}

/// Fallback for seasonal products that cannot be served from stock right now.
pub fn handle_seasonal_product(p: &Product, now: DateTime<Utc>) -> Decision {
    if will_delay_exceed_season(p, now) {
        return Decision::new(
            Disposition::SeasonOverrun,
            vec![
                Effect::Notify(Notification::out_of_stock(p.name.clone())),
                Effect::Persist(p.unavailable()),
            ],
        );
    }

    if !is_in_season(p, now) {
        return Decision::new(
            Disposition::OutOfSeason,
            vec![
                Effect::Notify(Notification::out_of_stock(p.name.clone())),
                Effect::Persist(p.clone()),
            ],
        );
    }

    notify_delay(p.lead_time, p)
}

pub fn process_expirable_product(p: &Product, now: DateTime<Utc>) -> Result<Decision, DispositionError> {
    if p.in_stock() && !is_expired(p, now) {
        return Ok(fulfil(p));
    }

    handle_expired_product(p, now)
}

/// Fallback for expirable products. Re-checks sellability so it can be
/// called on its own.
///
/// Fails with [`DispositionError::MissingExpiryDate`] (and no effects) when
/// the product cannot be sold and carries no expiry date.
pub fn handle_expired_product(p: &Product, now: DateTime<Utc>) -> Result<Decision, DispositionError> {
    if p.in_stock() && !is_expired(p, now) {
        return Ok(fulfil(p));
    }

    let expiry_date = p.expiry_date.ok_or_else(|| DispositionError::MissingExpiryDate {
        product_id: p.id,
        name: p.name.clone(),
    })?;

    Ok(Decision::new(
        Disposition::Expired,
        vec![
            Effect::Notify(Notification::expiration(p.name.clone(), expiry_date)),
            Effect::Persist(p.unavailable()),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn d(days: i64) -> Duration {
        Duration::days(days)
    }

    fn watermelon(available: u32, lead_time: u32, now: DateTime<Utc>) -> Product {
        Product::seasonal("Watermelon", available, lead_time, now - d(2), now + d(10))
    }

    #[test]
    fn normal_in_stock_decrements_without_notification() {
        let p = Product::normal("USB Hub", 3, 0);
        let decision = process_product(&p, now()).unwrap();

        assert_eq!(decision.disposition, Disposition::Fulfilled { remaining: 2 });
        assert_eq!(decision.persisted().unwrap().available, 2);
        assert!(decision.notification().is_none());
    }

    #[test]
    fn normal_out_of_stock_with_lead_time_notifies_delay() {
        let p = Product::normal("RJ45 Cable", 0, 15);
        let decision = process_product(&p, now()).unwrap();

        assert_eq!(decision.disposition, Disposition::Delayed { lead_time_days: 15 });
        assert_eq!(
            decision.effects,
            vec![
                Effect::Persist(p.clone()),
                Effect::Notify(Notification::delay(15, "RJ45 Cable")),
            ]
        );
    }

    #[test]
    fn normal_without_stock_or_lead_time_is_silent() {
        let p = Product::normal("Discontinued", 0, 0);
        let decision = process_product(&p, now()).unwrap();
        assert_eq!(decision.disposition, Disposition::Unfulfilled);
        assert!(decision.is_noop());
    }

    #[test]
    fn notify_delay_persists_new_lead_time_before_notifying() {
        let p = Product::normal("RJ45 Cable", 0, 15);
        let decision = notify_delay(20, &p);

        match decision.effects.as_slice() {
            [Effect::Persist(saved), Effect::Notify(n)] => {
                assert_eq!(saved.lead_time, 20);
                assert_eq!(saved.available, 0);
                assert_eq!(n, &Notification::delay(20, "RJ45 Cable"));
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn seasonal_in_season_with_stock_decrements() {
        let now = now();
        let decision = process_product(&watermelon(10, 5, now), now).unwrap();

        assert_eq!(decision.disposition, Disposition::Fulfilled { remaining: 9 });
        assert!(decision.notification().is_none());
    }

    #[test]
    fn seasonal_delay_past_season_end_marks_unavailable() {
        let now = now();
        let p = Product::seasonal("Grapes", 0, 30, now - d(2), now + d(10));
        let decision = handle_seasonal_product(&p, now);

        assert_eq!(decision.disposition, Disposition::SeasonOverrun);
        assert_eq!(
            decision.effects,
            vec![
                Effect::Notify(Notification::out_of_stock("Grapes")),
                Effect::Persist(p.unavailable()),
            ]
        );
    }

    #[test]
    fn seasonal_in_season_with_stock_sells_even_if_restock_would_overrun() {
        let now = now();
        // Stock on hand is served first; the lead time only matters once it runs out.
        let p = Product::seasonal("Grapes", 3, 30, now - d(2), now + d(10));
        let decision = process_product(&p, now).unwrap();

        assert_eq!(decision.disposition, Disposition::Fulfilled { remaining: 2 });
        assert!(decision.notification().is_none());
    }

    #[test]
    fn seasonal_overrun_zeroes_stock_even_when_out_of_season() {
        let now = now();
        // Season ended yesterday; stock left over.
        let p = Product::seasonal("Pumpkin", 4, 1, now - d(30), now - d(1));
        let decision = process_seasonal_product(&p, now);

        assert_eq!(decision.disposition, Disposition::SeasonOverrun);
        assert_eq!(decision.persisted().unwrap().available, 0);
    }

    #[test]
    fn seasonal_before_season_start_notifies_and_rewrites_unchanged() {
        let now = now();
        let p = Product::seasonal("Strawberries", 6, 2, now + d(5), now + d(40));
        let decision = process_seasonal_product(&p, now);

        assert_eq!(decision.disposition, Disposition::OutOfSeason);
        assert_eq!(
            decision.effects,
            vec![
                Effect::Notify(Notification::out_of_stock("Strawberries")),
                Effect::Persist(p.clone()),
            ]
        );
    }

    #[test]
    fn seasonal_in_season_without_stock_and_short_delay_notifies_delay() {
        let now = now();
        let decision = process_seasonal_product(&watermelon(0, 3, now), now);
        assert_eq!(decision.disposition, Disposition::Delayed { lead_time_days: 3 });
        assert_eq!(decision.notification(), Some(&Notification::delay(3, "Watermelon")));
    }

    #[test]
    fn seasonal_without_bounds_is_never_in_season() {
        let mut p = Product::normal("Chestnuts", 5, 1);
        p.category = ProductCategory::Seasonal;
        let decision = process_seasonal_product(&p, now());
        assert_eq!(decision.disposition, Disposition::OutOfSeason);
        assert_eq!(decision.persisted().unwrap().available, 5);
    }

    #[test]
    fn expirable_not_expired_decrements() {
        let now = now();
        let p = Product::expirable("Butter", 5, 15, now + d(10));
        let decision = process_product(&p, now).unwrap();

        assert_eq!(decision.disposition, Disposition::Fulfilled { remaining: 4 });
        assert!(decision.notification().is_none());
    }

    #[test]
    fn expirable_past_expiry_notifies_and_zeroes_stock() {
        let now = now();
        let expiry = now - d(2);
        let p = Product::expirable("Milk", 1, 15, expiry);
        let decision = process_expirable_product(&p, now).unwrap();

        assert_eq!(decision.disposition, Disposition::Expired);
        assert_eq!(
            decision.effects,
            vec![
                Effect::Notify(Notification::expiration("Milk", expiry)),
                Effect::Persist(p.unavailable()),
            ]
        );
    }

    #[test]
    fn expirable_expiring_now_counts_as_expired() {
        let now = now();
        let p = Product::expirable("Yogurt", 3, 0, now);
        let decision = process_expirable_product(&p, now).unwrap();
        assert_eq!(decision.disposition, Disposition::Expired);
    }

    #[test]
    fn expirable_out_of_stock_is_handled_as_expired() {
        let now = now();
        let p = Product::expirable("Cheese", 0, 4, now + d(10));
        let decision = process_expirable_product(&p, now).unwrap();
        assert_eq!(decision.disposition, Disposition::Expired);
        assert_eq!(
            decision.notification(),
            Some(&Notification::expiration("Cheese", now + d(10)))
        );
    }

    #[test]
    fn expirable_without_expiry_date_sells_while_stocked() {
        let mut p = Product::normal("Honey", 2, 0);
        p.category = ProductCategory::Expirable;
        let decision = process_expirable_product(&p, now()).unwrap();
        assert_eq!(decision.disposition, Disposition::Fulfilled { remaining: 1 });
    }

    #[test]
    fn expiration_branch_without_expiry_date_fails_without_effects() {
        let mut p = Product::normal("Honey", 0, 0);
        p.category = ProductCategory::Expirable;

        let err = process_product(&p, now()).unwrap_err();
        assert_eq!(
            err,
            DispositionError::MissingExpiryDate {
                product_id: p.id,
                name: "Honey".to_string(),
            }
        );
        match DomainError::from(err) {
            DomainError::InvariantViolation(_) => {}
            other => panic!("expected InvariantViolation, got {other:?}"),
        }
    }

    #[test]
    fn handle_expired_rechecks_sellability() {
        let now = now();
        let p = Product::expirable("Butter", 2, 0, now + d(1));
        let decision = handle_expired_product(&p, now).unwrap();
        assert_eq!(decision.disposition, Disposition::Fulfilled { remaining: 1 });
    }

    #[test]
    fn unrecognized_category_is_reported_without_effects() {
        let mut p = Product::normal("Gift Card", 4, 0);
        p.category = ProductCategory::from("DIGITAL");

        let decision = process_product(&p, now()).unwrap();
        assert_eq!(
            decision.disposition,
            Disposition::UnhandledCategory {
                tag: "DIGITAL".to_string()
            }
        );
        assert!(decision.is_noop());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn category() -> impl Strategy<Value = ProductCategory> {
            prop_oneof![
                Just(ProductCategory::Normal),
                Just(ProductCategory::Seasonal),
                Just(ProductCategory::Expirable),
            ]
        }

        fn product() -> impl Strategy<Value = Product> {
            (
                category(),
                0u32..50,
                0u32..60,
                proptest::option::of(-30i64..30),
                proptest::option::of(-30i64..30),
                -30i64..30,
            )
                .prop_map(|(category, available, lead_time, start, end_len, expiry)| {
                    let base = Utc::now();
                    let mut p = Product::normal("Generated", available, lead_time);
                    p.category = category;
                    p.season_start_date = start.map(|s| base + Duration::days(s));
                    p.season_end_date = end_len.map(|e| base + Duration::days(e));
                    p.expiry_date = Some(base + Duration::days(expiry));
                    p
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: at most one write and one notification per decision.
            #[test]
            fn at_most_one_write_and_one_notification(p in product()) {
                let decision = process_product(&p, Utc::now()).unwrap();
                let writes = decision.effects.iter().filter(|e| matches!(e, Effect::Persist(_))).count();
                let notes = decision.effects.iter().filter(|e| matches!(e, Effect::Notify(_))).count();
                prop_assert!(writes <= 1);
                prop_assert!(notes <= 1);
            }

            /// Property: stock moves by at most one unit down, or to zero.
            #[test]
            fn stock_only_decrements_by_one_or_zeroes(p in product()) {
                let decision = process_product(&p, Utc::now()).unwrap();
                if let Some(saved) = decision.persisted() {
                    prop_assert!(
                        saved.available == p.available
                            || saved.available + 1 == p.available
                            || saved.available == 0
                    );
                    prop_assert_eq!(saved.id, p.id);
                }
            }

            /// Property: a fulfilment never comes with a notification.
            #[test]
            fn fulfilment_is_silent(p in product()) {
                let decision = process_product(&p, Utc::now()).unwrap();
                if let Disposition::Fulfilled { remaining } = decision.disposition {
                    prop_assert_eq!(remaining + 1, p.available);
                    prop_assert!(decision.notification().is_none());
                }
            }

            /// Property: re-running on the written state of a stock-zeroing
            /// decision lands on the same terminal state.
            #[test]
            fn zeroing_decisions_are_stable(p in product()) {
                let now = Utc::now();
                let first = process_product(&p, now).unwrap();
                if matches!(first.disposition, Disposition::SeasonOverrun | Disposition::Expired) {
                    let saved = first.persisted().unwrap().clone();
                    let second = process_product(&saved, now).unwrap();
                    prop_assert_eq!(&second.disposition, &first.disposition);
                    prop_assert_eq!(second.persisted(), Some(&saved));
                }
            }

            /// Property: the delay helper never changes stock.
            #[test]
            fn notify_delay_keeps_stock(p in product(), lead in 0u32..100) {
                let decision = notify_delay(lead, &p);
                prop_assert_eq!(decision.persisted().unwrap().available, p.available);
                prop_assert_eq!(decision.notification(), Some(&Notification::delay(lead, p.name.clone())));
            }
        }
    }
}
