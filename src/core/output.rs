//! User-facing rendering of errors and guidance.
//!
//! Every error the CLI can end with is rendered here so the wording stays in
//! one place. Headlines are red; guidance underneath is plain text.

use crate::core::error::WrapperError;
use crate::core::exec::ExecError;
use colored::Colorize;

/// Full stderr text for `err`, newline-terminated.
pub fn render_error(err: &WrapperError) -> String {
    let headline = err.to_string();
    match err {
        WrapperError::NotFound { available, .. } => {
            format!("{}\n{}\n", headline.red(), available_list(available))
        }
        WrapperError::AmbiguousArgs { action } => format!(
            "{}\n\n{} an addon with only one argument style at a time:\n\n    microk8s {} foo:'bar'\nor\n\n    microk8s {} foo --bar\n",
            headline.red(),
            action.title(),
            action,
            action
        ),
        WrapperError::PermissionDenied { user } => format!(
            "{}\nYou can either try again with sudo or add the user {} to the 'microk8s' group:\n\n    sudo usermod -a -G microk8s {}\n\nThe new group will be available on the user's next login.\n",
            headline, user, user
        ),
        WrapperError::ClusterLocked => format!(
            "{}\nPlease use `microk8s enable` on the master.\n",
            headline
        ),
        WrapperError::NotRunning => format!("{}\n", headline.red()),
        WrapperError::ExecError(ExecError::Failed { stderr, .. }) if !stderr.trim().is_empty() => {
            format!("{}\n{}\n", stderr.trim_end(), headline.red())
        }
        _ => format!("{} {}\n", "Error:".red().bold(), headline),
    }
}

pub fn available_list(names: &[String]) -> String {
    let mut text = String::from("The available addons are:");
    for name in names {
        text.push_str("\n - ");
        text.push_str(name);
    }
    text
}

pub fn print_error(err: &WrapperError) {
    eprint!("{}", render_error(err));
}
