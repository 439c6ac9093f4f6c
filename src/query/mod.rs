//! Glucolog Query Engine
//!
//! Time-bounded views over the record collection. Everything here is pure:
//! it takes the records and the current time as arguments and never touches
//! storage or the clock.
//!
//! - **filter**: inclusive range, local "today", last N days
//! - **window**: the report windows (today, 7 days, 30 days)
//!
//! # Example
//!
//! ```rust
//! use glucolog::query::{by_range, last_n_days, ReportWindow};
//! use glucolog::storage::{GlucoseRecord, MealTiming};
//! use chrono::Utc;
//!
//! let records = vec![
//!     GlucoseRecord::with_timestamp("b", 8.5, MealTiming::AfterMeal, 2000),
//!     GlucoseRecord::with_timestamp("a", 5.0, MealTiming::BeforeMeal, 1000),
//! ];
//!
//! assert_eq!(by_range(&records, 1000, 1500).len(), 1);
//! assert_eq!(last_n_days(&records, 7, 2000).len(), 2);
//! assert_eq!(ReportWindow::Today.select(&records, 2000, &Utc).len(), 2);
//! ```

mod error;
mod filter;
mod window;

pub use error::{QueryError, QueryResult};
pub use filter::{by_range, day_bounds, in_range, last_n_days, today, DAY_MILLIS};
pub use window::{Granularity, ReportWindow};
