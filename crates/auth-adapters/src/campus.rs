//! Campus derivation from verified .edu email addresses.
//!
//! The campus is the tenancy boundary of the board. It is computed once at
//! identity verification time and carried inside the session; the board core
//! never re-derives it per request.

use domains::{AppError, Result};

/// Derives the campus slug from a verified email address: the registrable
/// `.edu` domain with subdomains stripped, lowercased. `ada@cs.umich.edu`
/// and `ada@umich.edu` both map to `umich.edu`.
pub fn campus_from_email(email: &str) -> Result<String> {
    let (local, domain) = email
        .rsplit_once('@')
        .ok_or_else(|| AppError::validation("email address has no domain part"))?;
    if local.is_empty() {
        return Err(AppError::validation("email address has no local part"));
    }

    let domain = domain.to_ascii_lowercase();
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(AppError::validation(format!("malformed email domain '{domain}'")));
    }
    if labels[labels.len() - 1] != "edu" {
        return Err(AppError::validation(
            "campus verification requires a .edu email address",
        ));
    }

    Ok(labels[labels.len() - 2..].join("."))
}
