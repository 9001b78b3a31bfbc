/// Admin lead filtering
///
/// Query parameters are resolved into exactly one [`LeadFilter`]:
///
/// 1. `startDate` and `endDate` both present → inclusive `createdAt` range
/// 2. otherwise `occupationType` present → exact code match
/// 3. otherwise → every lead
///
/// A single date bound on its own is ignored (and logged), so the request
/// falls through to rule 2 or 3. Empty parameters count as absent.
///
/// Dates may be RFC 3339 timestamps or plain `YYYY-MM-DD` days. A plain day
/// covers the whole UTC day: as a start it means 00:00:00, as an end it means
/// the last instant of that day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::models::lead::LoanLead;
use crate::storage::{Storage, StorageResult};

/// Raw query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFilterParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub occupation_type: Option<String>,
}

/// Resolved filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadFilter {
    DateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Occupation(String),
    All,
}

/// Unparseable filter parameter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field}: {value}")]
pub struct FilterError {
    pub field: &'static str,
    pub value: String,
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

impl LeadFilterParams {
    /// Picks the filter to apply
    ///
    /// # Errors
    ///
    /// Returns an error if both dates are given and either cannot be parsed.
    pub fn resolve(&self) -> Result<LeadFilter, FilterError> {
        let start = present(&self.start_date);
        let end = present(&self.end_date);

        match (start, end) {
            (Some(start), Some(end)) => {
                return Ok(LeadFilter::DateRange {
                    start: parse_bound(start, Bound::Start, "startDate")?,
                    end: parse_bound(end, Bound::End, "endDate")?,
                });
            }
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    start_date = ?start,
                    end_date = ?end,
                    "Ignoring date filter with a single bound"
                );
            }
            (None, None) => {}
        }

        Ok(match present(&self.occupation_type) {
            Some(code) => LeadFilter::Occupation(code.to_string()),
            None => LeadFilter::All,
        })
    }
}

impl LeadFilter {
    /// Runs the filter against the store
    pub async fn apply(&self, storage: &dyn Storage) -> StorageResult<Vec<LoanLead>> {
        match self {
            LeadFilter::DateRange { start, end } => {
                storage.list_leads_by_date_range(*start, *end).await
            }
            LeadFilter::Occupation(code) => storage.list_leads_by_occupation_type(code).await,
            LeadFilter::All => storage.list_leads().await,
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bound(value: &str, bound: Bound, field: &'static str) -> Result<DateTime<Utc>, FilterError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = match bound {
            Bound::Start => day.and_hms_opt(0, 0, 0),
            Bound::End => day.and_hms_nano_opt(23, 59, 59, 999_999_999),
        };
        if let Some(naive) = naive {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(FilterError {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::CreateLoanLead;
    use crate::storage::MemoryStorage;

    fn params(start: Option<&str>, end: Option<&str>, occupation: Option<&str>) -> LeadFilterParams {
        LeadFilterParams {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
            occupation_type: occupation.map(str::to_string),
        }
    }

    #[test]
    fn test_both_dates_take_precedence() {
        let filter = params(
            Some("2025-01-01T00:00:00Z"),
            Some("2025-01-31T12:00:00+05:30"),
            Some("salaried"),
        )
        .resolve()
        .unwrap();

        assert_eq!(
            filter,
            LeadFilter::DateRange {
                start: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2025, 1, 31, 6, 30, 0).unwrap(),
            }
        );
    }

    #[test]
    fn test_plain_days_cover_whole_day() {
        let LeadFilter::DateRange { start, end } =
            params(Some("2025-03-01"), Some("2025-03-01"), None).resolve().unwrap()
        else {
            panic!("expected a date range");
        };

        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        assert!(end > Utc.with_ymd_and_hms(2025, 3, 1, 23, 59, 59).unwrap());
        assert!(end < Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_lone_bound_is_ignored() {
        let filter = params(Some("2025-01-01"), None, Some("salaried")).resolve().unwrap();
        assert_eq!(filter, LeadFilter::Occupation("salaried".to_string()));

        let filter = params(None, Some("2025-01-01"), None).resolve().unwrap();
        assert_eq!(filter, LeadFilter::All);
    }

    #[test]
    fn test_empty_params_are_absent() {
        let filter = params(Some(""), Some(""), Some(" ")).resolve().unwrap();
        assert_eq!(filter, LeadFilter::All);
    }

    #[test]
    fn test_invalid_date() {
        let err = params(Some("yesterday"), Some("2025-01-01"), None)
            .resolve()
            .unwrap_err();
        assert_eq!(err.field, "startDate");
        assert_eq!(err.to_string(), "Invalid startDate: yesterday");
    }

    #[tokio::test]
    async fn test_apply_occupation_filter() {
        let store = MemoryStorage::new();
        for code in ["salaried", "business", "salaried"] {
            store
                .create_lead(CreateLoanLead {
                    mobile_number: "9876543210".to_string(),
                    occupation_type: code.to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let found = LeadFilter::Occupation("salaried".to_string())
            .apply(&store)
            .await
            .unwrap();
        assert_eq!(found.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(LeadFilter::All.apply(&store).await.unwrap().len(), 3);
    }
}
