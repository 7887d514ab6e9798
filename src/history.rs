//! history.rs — capped in-memory log of recent verdicts for diagnostics.
//! Persistence proper is a collaborator concern; this only backs the
//! `/debug/history` endpoint.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::engine::VerdictReport;
use crate::fusion::Label;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub ts_unix: u64,
    pub label: Label,
    pub real_score: f32,
    pub fake_score: f32,
    pub confidence: f32,
    pub flagged_words: usize,
    pub suggestions: usize,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, report: &VerdictReport) {
        let entry = HistoryEntry {
            ts_unix: now_unix(),
            label: report.verdict.label,
            real_score: report.verdict.real_score,
            fake_score: report.verdict.fake_score,
            confidence: report.verdict.confidence,
            flagged_words: report.analytics.total_flagged(),
            suggestions: report.suggestions.len(),
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let start = v.len().saturating_sub(n);
        v[start..].to_vec()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierAdapter;
    use crate::config::ScannerConfig;
    use crate::engine::{evaluate, Evaluation, ScannerContext};
    use crate::ocr::RecognizedWord;

    fn sample_report() -> VerdictReport {
        let cfg = ScannerConfig::embedded_default();
        let ctx = ScannerContext::new(&cfg, ClassifierAdapter::unloaded(true));
        let words = vec![RecognizedWord::new("DepEd", 0, 0, 50, 14, 0.9)];
        match evaluate(&ctx, &words, None) {
            Evaluation::Verdict(r) => r,
            other => panic!("expected verdict, got {:?}", other),
        }
    }

    #[test]
    fn capped_at_capacity() {
        let h = History::with_capacity(3);
        let r = sample_report();
        for _ in 0..5 {
            h.push(&r);
        }
        assert_eq!(h.snapshot_last_n(10).len(), 3);
    }

    #[test]
    fn snapshot_returns_most_recent() {
        let h = History::with_capacity(100);
        let r = sample_report();
        h.push(&r);
        h.push(&r);
        let snap = h.snapshot_last_n(1);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].label, r.verdict.label);
    }
}
