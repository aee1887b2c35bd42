//! Printing the batch summary

use crate::batch::BatchSummary;
use crate::OutputFormat;

pub fn print_summary(summary: &BatchSummary, format: OutputFormat, quiet: bool) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: failed to serialize summary: {}", e),
        },
        OutputFormat::Text => {
            if quiet {
                return;
            }
            if summary.processed == 0 {
                println!("No OBJ files found in {}", summary.input_dir);
                return;
            }
            for report in &summary.files {
                match (&report.outcome, report.success) {
                    (Some(outcome), true) => println!(
                        "  ok    {}: {} -> {} faces ({:.1}% reduction, {})",
                        report.file,
                        outcome.original_faces,
                        outcome.final_faces,
                        outcome.actual_reduction_pct,
                        outcome.category
                    ),
                    _ => println!(
                        "  fail  {}: {}",
                        report.file,
                        report.error.as_deref().unwrap_or("unknown error")
                    ),
                }
            }
            println!();
            println!(
                "Processed {} file(s): {} succeeded, {} failed",
                summary.processed,
                summary.successful,
                summary.failed()
            );
            println!("Results saved to {}", summary.output_dir);
        }
    }
}
