//! Declarative field summarization
//!
//! A [`Summarizer`] holds one rule per output field. Each rule either counts
//! the source records or sums a key extracted from every record, optionally
//! post-processes the result, and writes it into the target.

use std::fmt::Debug;

use rust_decimal::Decimal;
use tracing::debug;

use crate::{ProfitError, ProfitResult};

/// A value that can be accumulated across source records
///
/// `zero` and `combine` form a monoid. For `Option<Decimal>` the empty value
/// is `None`: absent + absent = absent, absent + n = n, n + m = n + m.
pub trait Summable: Sized {
    fn zero() -> Self;
    fn combine(self, other: Self) -> Self;
    /// Value of a `Count` rule over `n` records
    fn from_count(n: usize) -> Self;
}

macro_rules! impl_summable_int {
    ($($t:ty),*) => {
        $(
            impl Summable for $t {
                fn zero() -> Self {
                    0
                }

                fn combine(self, other: Self) -> Self {
                    self + other
                }

                fn from_count(n: usize) -> Self {
                    n as $t
                }
            }
        )*
    };
}

impl_summable_int!(u32, u64, usize);

impl Summable for Decimal {
    fn zero() -> Self {
        Decimal::ZERO
    }

    fn combine(self, other: Self) -> Self {
        self + other
    }

    fn from_count(n: usize) -> Self {
        Decimal::from(n)
    }
}

impl Summable for Option<Decimal> {
    fn zero() -> Self {
        None
    }

    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Some(a), Some(b)) => Some(a + b),
            (Some(a), None) | (None, Some(a)) => Some(a),
            (None, None) => None,
        }
    }

    fn from_count(n: usize) -> Self {
        Some(Decimal::from(n))
    }
}

/// Key extractor for a `Sum` rule
pub type KeyFn<'a, S, V> = Box<dyn Fn(&S) -> V + 'a>;

/// Transformation applied to a computed value before assignment
pub type PostProcess<'a, V> = Box<dyn Fn(V) -> V + 'a>;

/// How an output field is derived from the source records
pub enum SummaryMethod<'a, S, V> {
    /// Number of source records
    Count,
    /// Sum of `key(record)` over every source record
    Sum(KeyFn<'a, S, V>),
}

impl<'a, S, V> SummaryMethod<'a, S, V> {
    pub fn sum(key: impl Fn(&S) -> V + 'a) -> Self {
        Self::Sum(Box::new(key))
    }
}

struct FieldRule<'a, S, T, V> {
    field: &'static str,
    method: SummaryMethod<'a, S, V>,
    post_process: Option<PostProcess<'a, V>>,
    assign: Box<dyn Fn(&mut T, V) + 'a>,
}

trait ApplyRule<S, T> {
    fn apply(&self, source: &[S], target: &mut T);
}

impl<S, T, V: Summable + Debug> ApplyRule<S, T> for FieldRule<'_, S, T, V> {
    fn apply(&self, source: &[S], target: &mut T) {
        let value = match &self.method {
            SummaryMethod::Count => V::from_count(source.len()),
            SummaryMethod::Sum(key) => source
                .iter()
                .fold(V::zero(), |acc, record| acc.combine(key(record))),
        };

        let value = match &self.post_process {
            Some(post_process) => post_process(value),
            None => value,
        };

        debug!(field = self.field, value = ?value, "Summarized field");
        (self.assign)(target, value);
    }
}

/// Reduces a slice of `S` records into the fields of a `T`
pub struct Summarizer<'a, S, T> {
    rules: Vec<Box<dyn ApplyRule<S, T> + 'a>>,
}

impl<'a, S: 'a, T: 'a> Summarizer<'a, S, T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule for `field`.
    pub fn field<V>(
        mut self,
        field: &'static str,
        method: SummaryMethod<'a, S, V>,
        post_process: Option<PostProcess<'a, V>>,
        assign: impl Fn(&mut T, V) + 'a,
    ) -> Self
    where
        V: Summable + Debug + 'a,
    {
        self.rules.push(Box::new(FieldRule {
            field,
            method,
            post_process,
            assign: Box::new(assign),
        }));
        self
    }

    pub fn count<V>(self, field: &'static str, assign: impl Fn(&mut T, V) + 'a) -> Self
    where
        V: Summable + Debug + 'a,
    {
        self.field(field, SummaryMethod::Count, None, assign)
    }

    pub fn sum<V>(
        self,
        field: &'static str,
        key: impl Fn(&S) -> V + 'a,
        assign: impl Fn(&mut T, V) + 'a,
    ) -> Self
    where
        V: Summable + Debug + 'a,
    {
        self.field(field, SummaryMethod::sum(key), None, assign)
    }

    pub fn sum_with<V>(
        self,
        field: &'static str,
        key: impl Fn(&S) -> V + 'a,
        post_process: impl Fn(V) -> V + 'a,
        assign: impl Fn(&mut T, V) + 'a,
    ) -> Self
    where
        V: Summable + Debug + 'a,
    {
        self.field(
            field,
            SummaryMethod::sum(key),
            Some(Box::new(post_process)),
            assign,
        )
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule to `source`, writing the results into `target`.
    ///
    /// Rules run in the order they were added. Fails without touching
    /// `target` when `source` is empty.
    pub fn summarize(&self, source: &[S], target: &mut T) -> ProfitResult<()> {
        if source.is_empty() {
            return Err(ProfitError::EmptyInput {
                what: "summary source",
            });
        }

        for rule in &self.rules {
            rule.apply(source, target);
        }

        Ok(())
    }
}

impl<'a, S: 'a, T: 'a> Default for Summarizer<'a, S, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct Row {
        qty: u64,
        amount: Decimal,
        usd: Option<Decimal>,
    }

    #[derive(Default)]
    struct Totals {
        rows: usize,
        qty: u64,
        amount: Decimal,
        usd: Option<Decimal>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                qty: 2,
                amount: dec!(1.25),
                usd: None,
            },
            Row {
                qty: 3,
                amount: dec!(-0.5),
                usd: Some(dec!(5)),
            },
            Row {
                qty: 5,
                amount: dec!(0.125),
                usd: None,
            },
        ]
    }

    #[test]
    fn test_count_and_sum() {
        let summarizer = Summarizer::<Row, Totals>::new()
            .count("rows", |t, n| t.rows = n)
            .sum("qty", |r| r.qty, |t, v| t.qty = v)
            .sum("amount", |r| r.amount, |t, v| t.amount = v);

        let mut totals = Totals::default();
        summarizer.summarize(&rows(), &mut totals).unwrap();

        assert_eq!(totals.rows, 3);
        assert_eq!(totals.qty, 10);
        assert_eq!(totals.amount, dec!(0.875));
    }

    #[test]
    fn test_post_process_applied_after_sum() {
        let summarizer = Summarizer::<Row, Totals>::new().sum_with(
            "amount",
            |r| r.amount,
            |v: Decimal| v.floor(),
            |t, v| t.amount = v,
        );

        let mut totals = Totals::default();
        summarizer.summarize(&rows(), &mut totals).unwrap();
        assert_eq!(totals.amount, dec!(0));
    }

    #[test]
    fn test_nullable_sum_skips_missing_values() {
        let summarizer =
            Summarizer::<Row, Totals>::new().sum("usd", |r| r.usd, |t, v| t.usd = v);

        let mut totals = Totals::default();
        summarizer.summarize(&rows(), &mut totals).unwrap();
        assert_eq!(totals.usd, Some(dec!(5)));
    }

    #[test]
    fn test_nullable_sum_all_missing_stays_none() {
        let source: Vec<Row> = rows().into_iter().filter(|r| r.usd.is_none()).collect();
        let summarizer =
            Summarizer::<Row, Totals>::new().sum("usd", |r| r.usd, |t, v| t.usd = v);

        let mut totals = Totals {
            usd: Some(dec!(99)),
            ..Default::default()
        };
        summarizer.summarize(&source, &mut totals).unwrap();
        assert_eq!(totals.usd, None);
    }

    #[test]
    fn test_empty_source_rejected() {
        let summarizer = Summarizer::<Row, Totals>::new().count("rows", |t, n| t.rows = n);
        let mut totals = Totals {
            rows: 7,
            ..Default::default()
        };

        let err = summarizer.summarize(&[], &mut totals).unwrap_err();
        assert!(matches!(err, ProfitError::EmptyInput { .. }));
        assert_eq!(totals.rows, 7);
    }

    #[test]
    fn test_nullable_monoid_laws() {
        let a = Some(dec!(1.5));
        let b = Some(dec!(-2));
        assert_eq!(None::<Decimal>.combine(None), None);
        assert_eq!(a.combine(None), a);
        assert_eq!(None::<Decimal>.combine(a), a);
        assert_eq!(a.combine(b), Some(dec!(-0.5)));
        assert_eq!(a.combine(b), b.combine(a));
    }

    #[test]
    fn test_rules_counted() {
        let summarizer = Summarizer::<Row, Totals>::new()
            .count("rows", |t, n| t.rows = n)
            .sum("qty", |r| r.qty, |t, v| t.qty = v);
        assert_eq!(summarizer.len(), 2);
        assert!(!summarizer.is_empty());
        assert!(Summarizer::<Row, Totals>::default().is_empty());
    }
}
