//! # Order List Engine
//!
//! Status derivation, filtering, sorting and summaries over an in-memory
//! list of orders. Used by both "My Orders" and the admin order table.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       OrderQuery::apply                                 │
//! │                                                                         │
//! │   orders ──► status? ──AND──► text? ──AND──► date range? ──► stable sort│
//! │                                                                         │
//! │   status      derive_status(order) == filter   (or filter = all)       │
//! │   text        case-insensitive substring over order id, order number,  │
//! │               product name, customer name, customer email              │
//! │   date range  bucket relative to the injected `now`                    │
//! │   sort        date asc/desc, price asc/desc; ties keep input order     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Missing Fields
//! A missing field never matches a non-trivial filter. For sorting a missing
//! total counts as zero and a missing timestamp as the earliest instant.
//!
//! The engine never reads the clock: callers pass `now`, which keeps the
//! whole module deterministic and testable.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;
use crate::types::Order;
use crate::DEFAULT_STATUS_LABEL;

// =============================================================================
// Order Status
// =============================================================================

/// Display status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum OrderStatus {
    Ordered,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    CashOnDelivery,
    Pending,
}

impl OrderStatus {
    /// Every status, in display order.
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Ordered,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::CashOnDelivery,
        OrderStatus::Pending,
    ];

    /// Matches a free-form backend label to a status.
    ///
    /// Labels come from two backend fields with inconsistent casing and
    /// wording ("CASH ON DELIVERY", "Out for delivery", "order placed").
    /// Known labels are matched exactly after normalizing case, `_` and `-`.
    /// Anything else falls back to word matching:
    ///
    /// 1. a negation ("not", "no", "unpaid", "undelivered") means the step
    ///    has not happened yet, so the order is still pending
    /// 2. "cancel", then "cash"/"cod", then shipping words ("ship",
    ///    "dispatch", "transit", "out for delivery"), then "deliver"
    /// 3. "process"/"pack", "pending", then order/payment words
    ///
    /// Returns `None` for empty or unrecognized labels.
    pub fn from_label(raw: &str) -> Option<OrderStatus> {
        let label = normalize_label(raw);
        if label.is_empty() {
            return None;
        }

        let exact = match label.as_str() {
            "ordered" | "order placed" | "placed" | "confirmed" | "paid" => Some(OrderStatus::Ordered),
            "processing" | "packed" | "packing" => Some(OrderStatus::Processing),
            "shipped" | "dispatched" | "in transit" | "out for delivery" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" | "canceled" => Some(OrderStatus::Cancelled),
            "cash on delivery" | "cod" => Some(OrderStatus::CashOnDelivery),
            "pending" | "unpaid" | "payment pending" => Some(OrderStatus::Pending),
            _ => None,
        };
        if exact.is_some() {
            return exact;
        }

        let words: Vec<&str> = label.split(' ').collect();
        let has = |prefix: &str| words.iter().any(|w| w.starts_with(prefix));

        let status = if words.iter().any(|w| is_negation(w)) {
            OrderStatus::Pending
        } else if has("cancel") {
            OrderStatus::Cancelled
        } else if has("cash") || words.contains(&"cod") {
            OrderStatus::CashOnDelivery
        } else if has("ship")
            || has("dispatch")
            || has("transit")
            || label.contains("out for deliver")
        {
            OrderStatus::Shipped
        } else if has("deliver") {
            OrderStatus::Delivered
        } else if has("process") || has("pack") {
            OrderStatus::Processing
        } else if has("pending") || has("await") {
            OrderStatus::Pending
        } else if has("order") || has("placed") || has("paid") || has("confirm") {
            OrderStatus::Ordered
        } else {
            return None;
        };

        Some(status)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "Ordered",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::CashOnDelivery => "Cash on Delivery",
            OrderStatus::Pending => DEFAULT_STATUS_LABEL,
        }
    }

    /// Stable key used in query strings and filter menus.
    pub fn key(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ordered",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::CashOnDelivery => "cash-on-delivery",
            OrderStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Derives the display status of an order.
///
/// `order_status` wins when present, then `payment_status`; blank strings
/// count as absent. A label that matches nothing, or no label at all,
/// yields [`OrderStatus::Pending`].
pub fn derive_status(order: &Order) -> OrderStatus {
    let raw = [order.order_status.as_deref(), order.payment_status.as_deref()]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty());

    raw.and_then(OrderStatus::from_label)
        .unwrap_or(OrderStatus::Pending)
}

/// Lowercases and collapses `_`, `-` and runs of whitespace into single spaces.
fn normalize_label(raw: &str) -> String {
    raw.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

const NEGATABLE: [&str; 6] = ["paid", "deliver", "ship", "dispatch", "confirm", "process"];

fn is_negation(word: &str) -> bool {
    matches!(word, "not" | "no" | "never")
        || word
            .strip_prefix("un")
            .is_some_and(|rest| NEGATABLE.iter().any(|k| rest.starts_with(k)))
}

// =============================================================================
// Filters
// =============================================================================

/// Status part of an order filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    fn matches(&self, order: &Order) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => derive_status(order) == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        if key.is_empty() || key == "all" {
            return Ok(StatusFilter::All);
        }
        OrderStatus::ALL
            .iter()
            .find(|status| status.key() == key)
            .copied()
            .or_else(|| OrderStatus::from_label(&key))
            .map(StatusFilter::Only)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

/// Date-range bucket relative to `now`.
///
/// Calendar buckets ([`DateRange::Today`], [`DateRange::ThisYear`]) use the
/// time zone of the `now` passed in, so a customer in IST sees an order
/// placed at 00:30 local time under today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum DateRange {
    #[default]
    All,
    Today,
    Last7Days,
    Last30Days,
    Last90Days,
    ThisYear,
}

impl DateRange {
    /// Returns true if `created` falls in the bucket.
    ///
    /// A missing timestamp only matches [`DateRange::All`].
    pub fn contains<Tz: TimeZone>(&self, created: Option<DateTime<Utc>>, now: &DateTime<Tz>) -> bool {
        let created = match (self, created) {
            (DateRange::All, _) => return true,
            (_, None) => return false,
            (_, Some(created)) => created,
        };
        let local = created.with_timezone(&now.timezone());
        let now_utc = now.with_timezone(&Utc);

        match self {
            DateRange::All => true,
            DateRange::Today => local.date_naive() == now.date_naive(),
            DateRange::Last7Days => created >= now_utc - Duration::days(7),
            DateRange::Last30Days => created >= now_utc - Duration::days(30),
            DateRange::Last90Days => created >= now_utc - Duration::days(90),
            DateRange::ThisYear => local.year() == now.year(),
        }
    }
}

impl FromStr for DateRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "7d" | "last-7-days" | "week" => Ok(DateRange::Last7Days),
            "30d" | "last-30-days" | "month" => Ok(DateRange::Last30Days),
            "90d" | "last-90-days" => Ok(DateRange::Last90Days),
            "year" | "this-year" => Ok(DateRange::ThisYear),
            other => Err(CoreError::UnknownDateRange(other.to_string())),
        }
    }
}

/// AND-combined order filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub status: StatusFilter,
    /// Free-text query; blank matches everything.
    pub text: String,
    pub date_range: DateRange,
}

impl OrderFilter {
    /// Returns true if the order passes all three predicates.
    pub fn matches<Tz: TimeZone>(&self, order: &Order, now: &DateTime<Tz>) -> bool {
        self.status.matches(order)
            && self.matches_text(order)
            && self.date_range.contains(order.created_at, now)
    }

    fn matches_text(&self, order: &Order) -> bool {
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(order.id.as_str()),
            order.order_id.as_deref(),
            order.product_name(),
            order.customer_name(),
            order.customer_email(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort order for order lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SortKey {
    DateAsc,
    #[default]
    DateDesc,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    /// Compares two orders under this key.
    pub fn compare(&self, a: &Order, b: &Order) -> Ordering {
        match self {
            SortKey::DateAsc => date_key(a).cmp(&date_key(b)),
            SortKey::DateDesc => date_key(b).cmp(&date_key(a)),
            SortKey::PriceAsc => a.total_or_zero().cmp(&b.total_or_zero()),
            SortKey::PriceDesc => b.total_or_zero().cmp(&a.total_or_zero()),
        }
    }

    /// Sorts in place. `sort_by` is stable, so equal keys keep input order.
    pub fn sort(&self, orders: &mut [Order]) {
        orders.sort_by(|a, b| self.compare(a, b));
    }
}

fn date_key(order: &Order) -> DateTime<Utc> {
    order.created_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date-asc" | "oldest" => Ok(SortKey::DateAsc),
            "" | "date-desc" | "newest" => Ok(SortKey::DateDesc),
            "price-asc" | "price-low" => Ok(SortKey::PriceAsc),
            "price-desc" | "price-high" => Ok(SortKey::PriceDesc),
            other => Err(CoreError::UnknownSortKey(other.to_string())),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            SortKey::DateAsc => "date-asc",
            SortKey::DateDesc => "date-desc",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
        };
        f.write_str(key)
    }
}

// =============================================================================
// Query
// =============================================================================

/// A filter plus a sort key, applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
    pub filter: OrderFilter,
    pub sort: SortKey,
}

impl OrderQuery {
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.filter.status = status;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.filter.text = text.into();
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.filter.date_range = range;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Produces a new, filtered and sorted list. The input is untouched.
    ///
    /// `now` also fixes the time zone of the calendar date buckets.
    pub fn apply<Tz: TimeZone>(&self, orders: &[Order], now: DateTime<Tz>) -> Vec<Order> {
        let mut visible: Vec<Order> = orders
            .iter()
            .filter(|order| self.filter.matches(order, &now))
            .cloned()
            .collect();
        self.sort.sort(&mut visible);
        visible
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Aggregate figures for the admin order dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total_orders: usize,
    /// Sum of totals across orders that are not cancelled.
    pub revenue: Money,
    pub by_status: BTreeMap<OrderStatus, usize>,
}

impl OrderSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut summary = OrderSummary {
            total_orders: orders.len(),
            ..Default::default()
        };

        for order in orders {
            let status = derive_status(order);
            *summary.by_status.entry(status).or_insert(0) += 1;
            if status != OrderStatus::Cancelled {
                summary.revenue += order.total_or_zero();
            }
        }

        summary
    }

    /// Count for one status (zero when absent).
    pub fn count(&self, status: OrderStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomerSnapshot, ProductSnapshot};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn order(id: &str, total: i64, days_ago: i64) -> Order {
        let mut order = Order::bare(id);
        order.total = Some(Money::from_minor(total));
        order.created_at = Some(now() - Duration::days(days_ago));
        order
    }

    fn with_status(mut order: Order, status: &str) -> Order {
        order.order_status = Some(status.to_string());
        order
    }

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.id.as_str()).collect()
    }

    fn fixture() -> Vec<Order> {
        let mut a = with_status(order("a", 500, 0), "Delivered");
        a.product_details = Some(ProductSnapshot {
            name: Some("Fresh Paneer 200g".into()),
            ..Default::default()
        });
        a.customer = Some(CustomerSnapshot {
            name: Some("Asha Verma".into()),
            email: Some("asha@example.in".into()),
        });

        let mut b = order("b", 1200, 10);
        b.payment_status = Some("CASH ON DELIVERY".into());
        b.order_id = Some("ORD-7781".into());

        let c = with_status(order("c", 300, 40), "cancelled by user");
        let d = Order::bare("d");
        let e = with_status(order("e", 1200, 3), "Shipped");

        vec![a, b, c, d, e]
    }

    #[test]
    fn test_status_defaults_to_pending() {
        assert_eq!(derive_status(&Order::bare("x")), OrderStatus::Pending);

        let mut blank = Order::bare("y");
        blank.order_status = Some("   ".into());
        blank.payment_status = Some(String::new());
        assert_eq!(derive_status(&blank), OrderStatus::Pending);
    }

    #[test]
    fn test_status_prefers_order_status() {
        let mut o = Order::bare("x");
        o.payment_status = Some("CASH ON DELIVERY".into());
        assert_eq!(derive_status(&o), OrderStatus::CashOnDelivery);

        o.order_status = Some("shipped".into());
        assert_eq!(derive_status(&o), OrderStatus::Shipped);
    }

    #[test]
    fn test_status_label_matching() {
        assert_eq!(OrderStatus::from_label("Cash on Delivery"), Some(OrderStatus::CashOnDelivery));
        assert_eq!(OrderStatus::from_label("DELIVERED"), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::from_label("Order Placed"), Some(OrderStatus::Ordered));
        assert_eq!(OrderStatus::from_label("processing"), Some(OrderStatus::Processing));
        assert_eq!(OrderStatus::from_label("Canceled"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::from_label("???"), None);

        assert_eq!(OrderStatus::from_label("Out for delivery"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::from_label("OUT_FOR_DELIVERY"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::from_label("in-transit"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::from_label("Not delivered"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::from_label("Undelivered"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::from_label("Unpaid"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::from_label("Order not placed"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::from_label("cancelled by user"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::from_label("CASH ON DELIVERY"), Some(OrderStatus::CashOnDelivery));
        assert_eq!(OrderStatus::from_label("Delivered to customer"), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::from_label("payment received, order confirmed"), Some(OrderStatus::Ordered));

        let mut o = Order::bare("x");
        o.order_status = Some("on the moon".into());
        assert_eq!(derive_status(&o), OrderStatus::Pending);
    }

    #[test]
    fn test_price_and_date_sort_example() {
        let d1 = now() - Duration::days(2);
        let d2 = now() - Duration::days(1);
        let mut one = Order::bare("1");
        one.total = Some(Money::from_minor(100));
        one.created_at = Some(d1);
        let mut two = Order::bare("2");
        two.total = Some(Money::from_minor(50));
        two.created_at = Some(d2);
        let orders = vec![one, two];

        let by_price = OrderQuery::default().with_sort(SortKey::PriceAsc).apply(&orders, now());
        assert_eq!(ids(&by_price), vec!["2", "1"]);

        let by_date = OrderQuery::default().with_sort(SortKey::DateDesc).apply(&orders, now());
        assert_eq!(ids(&by_date), vec!["2", "1"]);
    }

    #[test]
    fn test_cancelled_filter_example() {
        let orders = vec![
            with_status(order("x", 100, 1), "cancelled"),
            with_status(order("y", 100, 1), "shipped"),
        ];
        let query = OrderQuery::default().with_status("cancelled".parse().unwrap());
        assert_eq!(ids(&query.apply(&orders, now())), vec!["x"]);
    }

    #[test]
    fn test_text_filter_is_case_insensitive_across_fields() {
        let orders = fixture();
        let run = |text: &str| {
            let q = OrderQuery::default().with_text(text).with_sort(SortKey::DateAsc);
            ids(&q.apply(&orders, now()))
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        assert_eq!(run("PANEER"), vec!["a"]);
        assert_eq!(run("asha@EXAMPLE"), vec!["a"]);
        assert_eq!(run("verma"), vec!["a"]);
        assert_eq!(run("ord-77"), vec!["b"]);
        assert_eq!(run("nothing-matches"), Vec::<String>::new());
        assert_eq!(run("  ").len(), 5);
    }

    #[test]
    fn test_date_ranges() {
        let orders = fixture();
        let run = |range| {
            OrderQuery::default()
                .with_date_range(range)
                .with_sort(SortKey::DateAsc)
                .apply(&orders, now())
        };

        assert_eq!(ids(&run(DateRange::Today)), vec!["a"]);
        assert_eq!(ids(&run(DateRange::Last7Days)), vec!["e", "a"]);
        assert_eq!(ids(&run(DateRange::Last30Days)), vec!["b", "e", "a"]);
        // Missing timestamp only passes the "all" bucket.
        assert_eq!(run(DateRange::All).len(), 5);
        assert!(!ids(&run(DateRange::ThisYear)).contains(&"d"));
    }

    #[test]
    fn test_today_follows_callers_time_zone() {
        let ist = chrono::FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        // 02:00 on 15 June in IST, still 14 June in UTC.
        let now_utc = Utc.with_ymd_and_hms(2024, 6, 14, 20, 30, 0).unwrap();
        let now_ist = now_utc.with_timezone(&ist);

        let mut late_evening = Order::bare("late");
        late_evening.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 14, 18, 0, 0).unwrap());
        let mut after_midnight = Order::bare("early");
        after_midnight.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 14, 19, 0, 0).unwrap());
        let orders = vec![late_evening, after_midnight];

        let today = OrderQuery::default()
            .with_date_range(DateRange::Today)
            .with_sort(SortKey::DateAsc);
        assert_eq!(ids(&today.apply(&orders, now_ist)), vec!["early"]);
        assert_eq!(ids(&today.apply(&orders, now_utc)), vec!["late", "early"]);

        assert!(DateRange::Last7Days.contains(orders[0].created_at, &now_ist));
    }

    #[test]
    fn test_filter_is_sound_and_complete() {
        let orders = fixture();
        let statuses = std::iter::once(StatusFilter::All)
            .chain(OrderStatus::ALL.iter().copied().map(StatusFilter::Only));
        let ranges = [
            DateRange::All,
            DateRange::Today,
            DateRange::Last7Days,
            DateRange::Last30Days,
            DateRange::Last90Days,
            DateRange::ThisYear,
        ];
        let texts = ["", "a", "ord", "paneer", "zzz"];

        for status in statuses {
            for range in ranges {
                for text in texts {
                    let query = OrderQuery::default()
                        .with_status(status)
                        .with_date_range(range)
                        .with_text(text);
                    let result = query.apply(&orders, now());

                    assert!(result.iter().all(|o| query.filter.matches(o, &now())));
                    let expected = orders
                        .iter()
                        .filter(|o| query.filter.matches(o, &now()))
                        .count();
                    assert_eq!(result.len(), expected);
                }
            }
        }
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let orders = fixture();
        for key in [SortKey::DateAsc, SortKey::DateDesc, SortKey::PriceAsc, SortKey::PriceDesc] {
            let query = OrderQuery::default().with_sort(key);
            let once = query.apply(&orders, now());
            let twice = query.apply(&once, now());
            assert_eq!(once, twice);
        }

        // "b" and "e" share a total of 1200; input order is kept.
        let by_price = OrderQuery::default().with_sort(SortKey::PriceDesc).apply(&orders, now());
        assert_eq!(ids(&by_price), vec!["b", "e", "a", "c", "d"]);
    }

    #[test]
    fn test_missing_values_sort_as_defaults() {
        let orders = fixture();
        let asc = OrderQuery::default().with_sort(SortKey::DateAsc).apply(&orders, now());
        assert_eq!(asc[0].id, "d");
        let price_asc = OrderQuery::default().with_sort(SortKey::PriceAsc).apply(&orders, now());
        assert_eq!(price_asc[0].id, "d");
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("price-asc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!("newest".parse::<SortKey>().unwrap(), SortKey::DateDesc);
        assert!("sideways".parse::<SortKey>().is_err());
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "cash-on-delivery".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(OrderStatus::CashOnDelivery)
        );
        assert_eq!("30d".parse::<DateRange>().unwrap(), DateRange::Last30Days);
    }

    #[test]
    fn test_summary() {
        let summary = OrderSummary::from_orders(&fixture());
        assert_eq!(summary.total_orders, 5);
        assert_eq!(summary.count(OrderStatus::Delivered), 1);
        assert_eq!(summary.count(OrderStatus::Cancelled), 1);
        assert_eq!(summary.count(OrderStatus::Pending), 1);
        assert_eq!(summary.count(OrderStatus::Processing), 0);
        // 500 + 1200 + 0 + 1200; the cancelled 300 is excluded.
        assert_eq!(summary.revenue, Money::from_minor(2900));
    }
}
