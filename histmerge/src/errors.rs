use histmerge_types::MergeError;
use tracing::debug;

/// Display error in a user-friendly format without stack traces.
pub fn display_user_error(err: &anyhow::Error) {
    debug!("fatal error: {:?}", err);

    match err.downcast_ref::<MergeError>() {
        Some(MergeError::Aggregate(errors)) => {
            eprintln!("histmerge: aborted with {} errors, no output written", errors.len());
            for err in errors {
                eprintln!("histmerge: {err}");
            }
        }
        Some(merge_err) => eprintln!("histmerge: {merge_err}"),
        None => eprintln!("histmerge: {err:#}"),
    }
}
