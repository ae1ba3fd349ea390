//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `okra_form_core` linkage without a hosting page.
//! - Optionally import an experiment file and print a metadata summary.

use okra_form_core::{parse_experiment, ImportError};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("okra_form_core ping={}", okra_form_core::ping());
    println!("okra_form_core version={}", okra_form_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match summarize(Path::new(&path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("import failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(path: &Path) -> Result<(), ImportError> {
    let bytes = std::fs::read(path)?;
    let experiment = parse_experiment(&bytes)?;
    println!("experiment id={}", experiment.id);
    println!(
        "tasks={} ratings={} practice_task={} participants={}",
        experiment.tasks.len(),
        experiment.ratings.len(),
        experiment.practice_task.is_some(),
        experiment.assignments.len()
    );
    match experiment.validate() {
        Ok(()) => println!("references=ok"),
        Err(err) => println!("references=stale ({err})"),
    }
    Ok(())
}
