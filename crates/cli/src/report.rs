//! Plain-text rendering of a run.

use orchestrator::{Decision, RestartStatus, RunReport, Verdict};
use std::io::{self, Write};

/// Write `report` to `out`. With `verbose`, entities without stale files and
/// scan warnings are listed too.
pub fn render<W: Write>(out: &mut W, report: &RunReport, verbose: bool) -> io::Result<()> {
    let plan = &report.plan;

    section(out, "Restart candidates", verdicts(&plan.units, Verdict::Restart))?;
    section(out, "Not selected", verdicts(&plan.units, Verdict::NotSelected))?;
    section(
        out,
        "Command lines with stale files",
        verdicts(&plan.cmdlines, Verdict::Report),
    )?;
    section(
        out,
        "Command lines not selected",
        verdicts(&plan.cmdlines, Verdict::NotSelected),
    )?;

    if verbose {
        section(
            out,
            "Units without stale files",
            verdicts(&plan.units, Verdict::NoEvidence),
        )?;
        section(
            out,
            "Command lines without stale files",
            verdicts(&plan.cmdlines, Verdict::NoEvidence),
        )?;

        if !report.warnings.is_empty() {
            writeln!(out, "Warnings:")?;
            for warning in &report.warnings {
                writeln!(out, "  {warning}")?;
            }
        }
    }

    if !report.restarts.outcomes.is_empty() {
        writeln!(out, "Restarts:")?;
        for outcome in &report.restarts.outcomes {
            match &outcome.status {
                RestartStatus::Restarted => writeln!(out, "  {} ... done", outcome.unit)?,
                RestartStatus::Skipped => {
                    writeln!(out, "  {} ... skipped (dry run)", outcome.unit)?
                }
                RestartStatus::Failed { diagnostic } => {
                    writeln!(out, "  {} ... FAILED: {diagnostic}", outcome.unit)?
                }
            }
            for line in outcome.output.lines() {
                writeln!(out, "      {line}")?;
            }
        }
    }

    writeln!(
        out,
        "{} processes, {} to restart, {} restarted, {} failed",
        report.processes,
        plan.count(Verdict::Restart),
        report.restarts.restarted(),
        report.restarts.failed(),
    )
}

fn verdicts(decisions: &[Decision], verdict: Verdict) -> impl Iterator<Item = &Decision> {
    decisions.iter().filter(move |d| d.verdict == verdict)
}

fn section<'a, W: Write>(
    out: &mut W,
    title: &str,
    decisions: impl Iterator<Item = &'a Decision>,
) -> io::Result<()> {
    let mut decisions = decisions.peekable();
    if decisions.peek().is_none() {
        return Ok(());
    }
    writeln!(out, "{title}:")?;
    for decision in decisions {
        writeln!(out, "  {}", decision.entity.name)?;
        for reason in &decision.entity.reasons {
            writeln!(out, "    {}", reason.display())?;
        }
    }
    Ok(())
}
