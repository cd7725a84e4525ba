use std::io::{self, Write};

use anyhow::{Context, Result};
use faq_engine::{EvalSummary, FaqEntry, MatchSource, Reply};

pub fn print_reply(reply: &Reply, json: bool) -> Result<()> {
    let mut out = io::stdout();
    if json {
        serde_json::to_writer_pretty(&mut out, reply).context("serialize reply")?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", reply.answer)?;
    }
    Ok(())
}

pub fn write_faqs(out: &mut impl Write, entries: &[FaqEntry]) -> Result<()> {
    for entry in entries {
        writeln!(out, "Q: {}", entry.question)?;
        writeln!(out, "A: {}", entry.answer)?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn print_faqs(entries: &[FaqEntry]) -> Result<()> {
    write_faqs(&mut io::stdout(), entries)
}

fn format_source(source: MatchSource) -> String {
    match source {
        MatchSource::Faq(idx) => format!("faq:{idx}"),
        MatchSource::Interaction(idx) => format!("interaction:{idx}"),
        MatchSource::Fallback => "fallback".to_string(),
    }
}

pub fn print_eval_summary(summary: &EvalSummary, min_pass_rate: f32) -> Result<()> {
    let mut out = io::stdout();
    writeln!(
        out,
        "total={} passed={} failed={} pass_rate={:.4} required={:.4} meets_threshold={}",
        summary.total,
        summary.passed,
        summary.failed,
        summary.pass_rate,
        min_pass_rate,
        summary.pass_rate >= min_pass_rate
    )?;

    for o in &summary.outcomes {
        writeln!(
            out,
            "case={} passed={} source={} score={:.4} latency={:.1}ms",
            o.case_id,
            o.passed,
            format_source(o.source),
            o.score,
            o.latency_ms
        )?;
    }

    let total_ms: f64 = summary.outcomes.iter().map(|o| o.latency_ms).sum();
    let avg_ms = total_ms / summary.outcomes.len().max(1) as f64;
    writeln!(out, "total_latency={total_ms:.1}ms avg_latency={avg_ms:.1}ms")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faqs_render_as_question_answer_blocks() {
        let mut buf = Vec::new();
        write_faqs(
            &mut buf,
            &[
                FaqEntry::new("Q one?", "A one."),
                FaqEntry::new("Q two?", "A two."),
            ],
        )
        .expect("write");

        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "Q: Q one?\nA: A one.\n\nQ: Q two?\nA: A two.\n\n");
    }

    #[test]
    fn sources_have_short_labels() {
        assert_eq!(format_source(MatchSource::Faq(2)), "faq:2");
        assert_eq!(format_source(MatchSource::Interaction(0)), "interaction:0");
        assert_eq!(format_source(MatchSource::Fallback), "fallback");
    }
}
