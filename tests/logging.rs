//! Log events emitted by the reshapers, captured with a scoped subscriber.

use std::io;
use std::sync::{Arc, Mutex};

use corr_reshape::{Column, DesignMatrix, MissingColAction, Table, WideToLong};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn studies() -> Table {
    Table::new(
        vec!["study", "r_ab", "r_ac"],
        vec![
            Column::from_strs(&["s1", "s2"]),
            Column::from_f64(vec![0.2, 0.3]),
            Column::from_f64(vec![0.4, 0.5]),
        ],
    )
    .unwrap()
}

/// `es[C, B]` names a column the data lacks.
fn es_with_absent_column() -> DesignMatrix {
    DesignMatrix::from_lower_triangle(
        &["A", "B", "C"],
        &[Some("r_ab"), Some("r_ac"), Some("r_pc_corrected")],
    )
    .unwrap()
}

/// Run the reshape under a WARN-level subscriber and return the log lines.
fn warnings_for(action: MissingColAction) -> Vec<String> {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let data = studies();
    let long = tracing::subscriber::with_default(subscriber, || {
        WideToLong::new(&data)
            .common_vars(&["study"])
            .es_design(es_with_absent_column())
            .missing_col_action(action)
            .run()
    })
    .unwrap();
    assert_eq!(long.row_count(), 4);

    captured.lines()
}

#[test]
fn warn_policy_logs_the_absent_column_once() {
    let lines = warnings_for(MissingColAction::Warn);
    let warnings: Vec<&String> = lines.iter().filter(|l| l.contains("WARN")).collect();

    assert_eq!(warnings.len(), 1, "log lines: {lines:?}");
    assert!(warnings[0].contains("r_pc_corrected"));
}

#[test]
fn ignore_policy_is_silent() {
    let lines = warnings_for(MissingColAction::Ignore);
    assert!(lines.iter().all(|l| !l.contains("WARN")), "log lines: {lines:?}");
}
