pub mod group;
pub mod post;
pub mod social;
pub mod user;

use quire::ValidationError;

use crate::output::OutputManager;

/// Prints one line per rejected field.
pub fn report_validation(output: &OutputManager, err: &ValidationError) {
    for issue in &err.issues {
        output.bullet(&format!("{}: {}", issue.field, issue.message));
    }
}
