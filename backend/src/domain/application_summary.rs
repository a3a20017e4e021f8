//! Review dashboard counters derived from a set of applications.

use serde::Serialize;

use super::{Application, ApplicationStatus};

/// Status counts and average credit score for a set of applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub total: usize,
    pub approved: usize,
    pub under_scrutiny: usize,
    pub rejected: usize,
    /// Mean credit score rounded to the nearest integer; 0 when empty.
    pub average_credit_score: i64,
}

impl ApplicationSummary {
    /// Tally the given applications.
    ///
    /// # Examples
    /// ```
    /// use loan_desk::domain::ApplicationSummary;
    ///
    /// let summary = ApplicationSummary::from_applications(&[]);
    /// assert_eq!(summary.total, 0);
    /// assert_eq!(summary.average_credit_score, 0);
    /// ```
    pub fn from_applications(applications: &[Application]) -> Self {
        let mut summary = Self {
            total: applications.len(),
            ..Self::default()
        };
        let mut score_sum: i64 = 0;
        for application in applications {
            score_sum += i64::from(application.credit_score());
            match application.status() {
                ApplicationStatus::Approved => summary.approved += 1,
                ApplicationStatus::UnderScrutiny => summary.under_scrutiny += 1,
                ApplicationStatus::Rejected => summary.rejected += 1,
            }
        }
        summary.average_credit_score = rounded_mean(score_sum, applications.len());
        summary
    }
}

fn rounded_mean(sum: i64, count: usize) -> i64 {
    let Ok(count) = i64::try_from(count) else {
        return 0;
    };
    if count == 0 {
        return 0;
    }
    // Rounds halves up.
    (2 * sum + count).div_euclid(2 * count)
}
