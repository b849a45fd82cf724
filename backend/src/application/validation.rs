//! Intake validation for submitted applications
//!
//! Declarative rules live on [`CreateApplicationRequest`] via `validator`;
//! rules that depend on the current date or on consent flags are checked here.

use chrono::NaiveDate;
use validator::Validate;

use super::error::FieldErrors;
use super::model::CreateApplicationRequest;

/// Validate a submission, collecting every failing field
pub fn validate_submission(
    request: &CreateApplicationRequest,
    today: NaiveDate,
) -> Result<(), FieldErrors> {
    let mut fields = FieldErrors::new();

    if let Err(errors) = request.validate() {
        for (field, failures) in errors.field_errors() {
            let name = to_camel_case(field);
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                fields.add(name.clone(), message);
            }
        }
    }

    if request.first_name.trim().chars().count() < 2 && !fields.contains("firstName") {
        fields.add("firstName", "first name must have at least 2 characters");
    }
    if request.last_name.trim().chars().count() < 2 && !fields.contains("lastName") {
        fields.add("lastName", "last name must have at least 2 characters");
    }
    if request.phone.trim().chars().count() < 10 && !fields.contains("phone") {
        fields.add("phone", "phone must have at least 10 characters");
    }
    if request.email.trim() != request.email && !fields.contains("email") {
        fields.add("email", "email must be a valid address");
    }
    if request.date_of_birth >= today {
        fields.add("dateOfBirth", "date of birth must be in the past");
    }
    if !request.terms_accepted {
        fields.add("termsAccepted", "terms and conditions must be accepted");
    }
    if !request.credit_check_accepted {
        fields.add("creditCheckAccepted", "credit check must be accepted");
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(fields)
    }
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
