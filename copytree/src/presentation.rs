// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Presentation
//!
//! Renders a run's outcome to the terminal. Grounded on the teacher's
//! `main.rs` `process_file` summary printing, trimmed to plain labeled
//! lines rather than the teacher's box-drawn panel — `--info` readers
//! here are piping into other tools as often as reading by eye.

use crate::infrastructure::delivery::DeliveryOutcome;
use crate::infrastructure::runtime::PipelineRunResult;

/// Prints the `--info` summary: per-stage timings, file counts, and
/// where the rendered document ended up (spec §6, "--info").
pub fn print_summary(result: &PipelineRunResult) {
    println!("copytree summary");
    println!("  files in:  {}", result.statistics.input_file_count);
    println!("  files out: {}", result.statistics.output_file_count);
    println!("  success:   {:.1}%", result.statistics.success_rate() * 100.0);
    println!("  total:     {}ms", result.statistics.total_duration_ms);

    if !result.statistics.stage_durations_ms.is_empty() {
        println!("  stages:");
        for (stage, duration_ms) in &result.statistics.stage_durations_ms {
            println!("    {stage:<20} {duration_ms}ms");
        }
    }

    if !result.statistics.errors.is_empty() {
        println!("  errors:");
        for error in &result.statistics.errors {
            println!("    - {error}");
        }
    }

    print_delivery(result.delivery.as_ref());
}

/// Prints only where the document was delivered, for runs without
/// `--info` that still want confirmation (anything but a bare stdout
/// dump, which is self-evident).
pub fn print_delivery(delivery: Option<&DeliveryOutcome>) {
    match delivery {
        None => println!("dry run: nothing delivered"),
        Some(DeliveryOutcome::CopiedToClipboard) => println!("copied to clipboard"),
        Some(DeliveryOutcome::PrintedToStdout) => {}
        Some(DeliveryOutcome::WrittenToFile(path)) => println!("written to {}", path.display()),
        Some(DeliveryOutcome::ClipboardFallback(path)) => {
            println!("clipboard unavailable; written to {}", path.display());
        }
        Some(DeliveryOutcome::FileReference(path)) => println!("file reference: {}", path.display()),
    }
}

/// Prints an `ask` reply.
pub fn print_ask_reply(reply: &str) {
    println!("{reply}");
}
