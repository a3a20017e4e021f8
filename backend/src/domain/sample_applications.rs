//! Built-in sample applications for demos and local development.

use super::{
    ApplicantDetails, ApplicationDraft, ApplicationStatus, ApplicationValidationError, CustomerId,
};

struct SampleRow {
    name: &'static str,
    email: &'static str,
    customer_id: &'static str,
    credit_score: i32,
    loan_type: &'static str,
    amount: &'static str,
    required_score: i32,
    status: ApplicationStatus,
}

const SAMPLES: [SampleRow; 10] = [
    SampleRow {
        name: "Alice Williams",
        email: "alice.williams@email.com",
        customer_id: "CUST001",
        credit_score: 720,
        loan_type: "Home Loan",
        amount: "500000",
        required_score: 700,
        status: ApplicationStatus::Approved,
    },
    SampleRow {
        name: "Liam Smith",
        email: "liam.smith@email.com",
        customer_id: "CUST002",
        credit_score: 640,
        loan_type: "Car Loan",
        amount: "200000",
        required_score: 650,
        status: ApplicationStatus::Rejected,
    },
    SampleRow {
        name: "Emma Johnson",
        email: "emma.johnson@email.com",
        customer_id: "CUST003",
        credit_score: 690,
        loan_type: "Personal Loan",
        amount: "100000",
        required_score: 680,
        status: ApplicationStatus::Approved,
    },
    SampleRow {
        name: "Noah Brown",
        email: "noah.brown@email.com",
        customer_id: "CUST004",
        credit_score: 560,
        loan_type: "Education Loan",
        amount: "300000",
        required_score: 600,
        status: ApplicationStatus::Rejected,
    },
    SampleRow {
        name: "Olivia Davis",
        email: "olivia.davis@email.com",
        customer_id: "CUST005",
        credit_score: 780,
        loan_type: "Home Loan",
        amount: "750000",
        required_score: 700,
        status: ApplicationStatus::Approved,
    },
    SampleRow {
        name: "William Wilson",
        email: "william.wilson@email.com",
        customer_id: "CUST006",
        credit_score: 620,
        loan_type: "Personal Loan",
        amount: "150000",
        required_score: 650,
        status: ApplicationStatus::UnderScrutiny,
    },
    SampleRow {
        name: "Sophia Moore",
        email: "sophia.moore@email.com",
        customer_id: "CUST007",
        credit_score: 740,
        loan_type: "Car Loan",
        amount: "400000",
        required_score: 700,
        status: ApplicationStatus::Approved,
    },
    SampleRow {
        name: "James Taylor",
        email: "james.taylor@email.com",
        customer_id: "CUST008",
        credit_score: 580,
        loan_type: "Education Loan",
        amount: "250000",
        required_score: 600,
        status: ApplicationStatus::UnderScrutiny,
    },
    SampleRow {
        name: "Isabella Anderson",
        email: "isabella.anderson@email.com",
        customer_id: "CUST009",
        credit_score: 710,
        loan_type: "Home Loan",
        amount: "600000",
        required_score: 700,
        status: ApplicationStatus::Approved,
    },
    SampleRow {
        name: "Benjamin Thomas",
        email: "benjamin.thomas@email.com",
        customer_id: "CUST010",
        credit_score: 820,
        loan_type: "Business Loan",
        amount: "1000000",
        required_score: 750,
        status: ApplicationStatus::UnderScrutiny,
    },
];

/// Drafts for the ten sample applications, customers `CUST001` to `CUST010`.
///
/// # Errors
/// Returns a validation error only if the built-in rows are edited into an
/// invalid shape.
pub fn sample_application_drafts() -> Result<Vec<ApplicationDraft>, ApplicationValidationError> {
    SAMPLES
        .iter()
        .map(|row| {
            let details = ApplicantDetails {
                email: Some(row.email.to_owned()),
                loan_type: row.loan_type.to_owned(),
                amount: Some(row.amount.to_owned()),
                ..ApplicantDetails::named(row.name)
            };
            Ok(ApplicationDraft {
                customer_id: CustomerId::new(row.customer_id)?,
                credit_score: row.credit_score,
                required_score: row.required_score,
                status: row.status,
                details,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_cover_every_status_with_distinct_customers() {
        let drafts = sample_application_drafts().expect("samples are valid");
        assert_eq!(drafts.len(), 10);

        let mut customers: Vec<&str> = drafts.iter().map(|d| d.customer_id.as_ref()).collect();
        customers.dedup();
        assert_eq!(customers.len(), 10);

        for status in ApplicationStatus::ALL {
            assert!(
                drafts.iter().any(|draft| draft.status == status),
                "samples should include {status}"
            );
        }
    }
}
