use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Warranty entity - a coverage interval for a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Warranty {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Coverage period in months
    pub period: i32,
    pub start_date: NaiveDate,
    /// `start_date + period` months
    pub end_date: NaiveDate,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl Warranty {
    /// Build a warranty from the creation DTO, deriving the end date.
    pub fn new(input: CreateWarranty) -> Self {
        let end_date = add_months(input.start_date, input.period);
        Self {
            id: Uuid::now_v7(),
            product_id: input.product_id,
            period: input.period,
            start_date: input.start_date,
            end_date,
            details: input.details,
            created_at: Utc::now(),
        }
    }

    /// Whether the interval covers today.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        today < self.end_date
    }

    /// Interval overlap: `[self.start, self.end]` intersects `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.end_date >= start && self.start_date <= end
    }
}

/// `date + months`, clamping the day when the target month is shorter.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    debug_assert!(months >= 0);
    date.checked_add_months(Months::new(months as u32))
        .unwrap_or(NaiveDate::MAX)
}

/// DTO for creating a warranty
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWarranty {
    pub product_id: Uuid,
    /// Coverage period in months, must be positive
    #[validate(range(min = 1, max = 120))]
    pub period: i32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub details: String,
}

/// Response for the warranty validity check
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WarrantyValidity {
    pub product_id: Uuid,
    pub valid: bool,
    pub end_date: NaiveDate,
}

/// Response for a warranty claim
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClaimResponse {
    pub message: String,
}

/// Pagination for warranty listings
#[derive(Debug, Clone, Copy, Deserialize, ToSchema, IntoParams)]
pub struct WarrantyFilter {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

impl Default for WarrantyFilter {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_date_is_start_plus_period() {
        let warranty = Warranty::new(CreateWarranty {
            product_id: Uuid::now_v7(),
            period: 12,
            start_date: date(2025, 3, 15),
            details: String::new(),
        });

        assert_eq!(warranty.end_date, date(2026, 3, 15));
    }

    #[test]
    fn test_add_months_clamps_short_months() {
        // Jan 31 + 1 month lands on Feb 28 in a non-leap year
        assert_eq!(add_months(date(2025, 1, 31), 1), date(2025, 2, 28));
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
    }

    #[test]
    fn test_overlap_inequalities() {
        let warranty = Warranty::new(CreateWarranty {
            product_id: Uuid::now_v7(),
            period: 6,
            start_date: date(2025, 1, 1),
            details: String::new(),
        });
        // Interval is [2025-01-01, 2025-07-01]

        // Fully inside
        assert!(warranty.overlaps(date(2025, 2, 1), date(2025, 3, 1)));
        // Straddles the start
        assert!(warranty.overlaps(date(2024, 12, 1), date(2025, 1, 1)));
        // Straddles the end
        assert!(warranty.overlaps(date(2025, 7, 1), date(2026, 1, 1)));
        // Entirely before
        assert!(!warranty.overlaps(date(2024, 1, 1), date(2024, 12, 31)));
        // Entirely after
        assert!(!warranty.overlaps(date(2025, 7, 2), date(2026, 1, 1)));
    }

    #[test]
    fn test_is_active_uses_end_exclusive() {
        let warranty = Warranty::new(CreateWarranty {
            product_id: Uuid::now_v7(),
            period: 6,
            start_date: date(2025, 1, 1),
            details: String::new(),
        });

        assert!(warranty.is_active(date(2025, 6, 30)));
        assert!(!warranty.is_active(date(2025, 7, 1)));
        assert!(!warranty.is_active(date(2025, 8, 1)));
    }
}
