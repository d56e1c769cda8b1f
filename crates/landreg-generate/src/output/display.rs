use std::fmt;

use landreg_core::{Application, TypeCatalog};

const RULE_WIDTH: usize = 60;

/// Human-readable block for one application, framed by rules.
pub fn format_application(application: &Application, catalog: &TypeCatalog) -> String {
    let type_name = catalog
        .lookup_by_id(application.application_type_id)
        .map(|definition| definition.name.clone())
        .unwrap_or_else(|_| format!("type #{}", application.application_type_id));
    ApplicationBlock {
        application,
        type_name: &type_name,
    }
    .to_string()
}

struct ApplicationBlock<'a> {
    application: &'a Application,
    type_name: &'a str,
}

impl fmt::Display for ApplicationBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let application = self.application;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "Reference: {} - {}", application.reference, self.type_name)?;
        writeln!(
            f,
            "Status: {} (Priority: {})",
            application.status, application.priority
        )?;
        writeln!(f, "Property: {}", application.property_address)?;
        writeln!(f, "Applicants: {}", application.applicants.join(", "))?;
        writeln!(
            f,
            "Submitted: {} - Expected completion: {}",
            application.submission_date, application.expected_completion_date
        )?;
        writeln!(f, "Form: {}", application.form_used)?;
        match (&application.lender, application.loan_amount) {
            (Some(lender), Some(amount)) => {
                writeln!(f, "Lender: {lender} (£{})", group_thousands(amount))?
            }
            (Some(lender), None) => writeln!(f, "Lender: {lender}")?,
            (None, Some(amount)) => writeln!(f, "Loan amount: £{}", group_thousands(amount))?,
            (None, None) => {}
        }
        if let Some(reason) = &application.reason_for_correction {
            writeln!(f, "Correction reason: {reason}")?;
        }
        f.write_str(&rule)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use landreg_core::ApplicationStatus;

    fn charge() -> Application {
        let submitted = NaiveDate::from_ymd_opt(2024, 5, 2).expect("date");
        Application {
            reference: "LR482913K".to_string(),
            application_type_id: 4,
            property_address: "25 Park Lane, Manchester, M1 3AB".to_string(),
            applicants: vec!["Emma Johnson".to_string(), "Oliver Brown".to_string()],
            submission_date: submitted,
            expected_completion_date: NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
            status: ApplicationStatus::OnHold,
            priority: 2,
            form_used: "CH1".to_string(),
            lender: Some("Barclays Bank PLC".to_string()),
            loan_amount: Some(1_250_000),
            reason_for_correction: None,
        }
    }

    #[test]
    fn formats_charge_block() {
        let catalog = TypeCatalog::embedded().expect("catalog");
        let text = format_application(&charge(), &catalog);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(RULE_WIDTH));
        assert_eq!(lines[1], "Reference: LR482913K - Charges/Mortgages");
        assert_eq!(lines[2], "Status: On Hold (Priority: 2)");
        assert_eq!(lines[4], "Applicants: Emma Johnson, Oliver Brown");
        assert_eq!(lines[5], "Submitted: 2024-05-02 - Expected completion: 2024-06-01");
        assert_eq!(lines[7], "Lender: Barclays Bank PLC (£1,250,000)");
        assert!(!text.contains("Correction reason"));
        assert_eq!(lines.last().copied(), Some("=".repeat(RULE_WIDTH).as_str()));
    }

    #[test]
    fn unknown_type_id_falls_back() {
        let catalog = TypeCatalog::embedded().expect("catalog");
        let mut application = charge();
        application.application_type_id = 999;
        assert!(format_application(&application, &catalog).contains("LR482913K - type #999"));
    }

    #[test]
    fn correction_block_has_reason_and_no_lender() {
        let catalog = TypeCatalog::embedded().expect("catalog");
        let mut application = charge();
        application.application_type_id = 6;
        application.form_used = "AP1".to_string();
        application.lender = None;
        application.loan_amount = None;
        application.reason_for_correction = Some("Boundary line misdrawn".to_string());

        let text = format_application(&application, &catalog);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Reference: LR482913K - Title Corrections");
        assert_eq!(lines[6], "Form: AP1");
        assert_eq!(lines[7], "Correction reason: Boundary line misdrawn");
        assert_eq!(lines.len(), 9);
        assert!(!text.contains("Lender"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(50_000), "50,000");
        assert_eq!(group_thousands(250_000), "250,000");
        assert_eq!(group_thousands(1_000_000), "1,000,000");
    }
}
