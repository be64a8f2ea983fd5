use anyhow::Result;
use armp::app::{AppState, FileSource, IngestSession, MemorySource};
use armp::{compute_leaderboard, compute_listing, ingest, FindingStatus, IngestError, IngestOptions};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "Category,Question,Responsible Team,Issue Finding Date,Issue Closed Date,Reopen Dates,Status,Reopen Count,Accumulated Points";

fn csv(rows: &[&str]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out
}

fn temp_csv(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_mixed_date_formats_and_statuses() -> Result<()> {
    let content = csv(&[
        "Safety,Exits?,Facilities,01/01/2024,January 5 2024,,,,",
        "Safety,Lights?,Facilities,2024-01-01 08:00,2024-01-02 09:00,,closed - late,0,3",
        "HR,Files?,People,5 Jan 2024,,,Reopened,1,-2",
    ]);
    let set = ingest(content.as_bytes(), &IngestOptions::for_file("audit.csv"))?;
    assert_eq!(set.len(), 3);

    let first = set.get(0).unwrap();
    assert_eq!(first.status, FindingStatus::ClosedTimely);
    assert_eq!(first.days_to_close, Some(4));
    assert_eq!(first.points, 0);
    assert_eq!(first.reopen_count, 0);

    // 25 hours rounds up to 2 days
    let second = set.get(1).unwrap();
    assert_eq!(second.status, FindingStatus::ClosedLate);
    assert_eq!(second.days_to_close, Some(2));

    assert_eq!(set.get(2).unwrap().status, FindingStatus::ReOpened);

    let rows = compute_listing(&set);
    assert_eq!(rows[0].closed_date, "2024-01-05");
    assert_eq!(rows[1].points, "+3");
    assert_eq!(rows[2].closed_date, "N/A");
    assert_eq!(rows[2].points, "-2");
    Ok(())
}

#[test]
fn test_bad_date_in_third_row() -> Result<()> {
    let content = csv(&[
        "Safety,Q1,Facilities,2024-01-01,,,,0,1",
        "Safety,Q2,Facilities,2024-01-02,,,,0,1",
        "Safety,Q3,Facilities,31/31/2024,,,,0,1",
    ]);
    let err = ingest(content.as_bytes(), &IngestOptions::for_file("audit.csv")).unwrap_err();
    assert!(matches!(err, IngestError::DateParse { row: 4, ref field } if field == "Issue Finding Date"));
    assert_eq!(
        err.to_string(),
        "Invalid date format in row 4 for 'Issue Finding Date'."
    );
    Ok(())
}

#[test]
fn test_empty_inputs() {
    let opts = IngestOptions::for_file("audit.csv");
    assert!(matches!(ingest(b"", &opts), Err(IngestError::EmptyInput)));
    assert!(matches!(
        ingest(csv(&[]).as_bytes(), &opts),
        Err(IngestError::EmptyInput)
    ));
    assert!(matches!(
        ingest(csv(&[",,,,,,,,", ""]).as_bytes(), &opts),
        Err(IngestError::EmptyInput)
    ));
}

#[test]
fn test_textual_zero_dates_mean_not_closed() -> Result<()> {
    let content = csv(&["Safety,Q,Facilities,2024-01-01,0,0,,0,1"]);
    let set = ingest(content.as_bytes(), &IngestOptions::for_file("audit.csv"))?;
    let finding = set.get(0).unwrap();
    assert_eq!(finding.issue_closed_date, None);
    assert_eq!(finding.reopen_date, None);
    assert_eq!(finding.days_to_close, None);
    assert_eq!(finding.status, FindingStatus::Open);
    Ok(())
}

#[test]
fn test_padded_status_label_is_recognized() -> Result<()> {
    let content = csv(&["Safety,Q,Facilities,2024-01-01,2024-01-03,, Closed - Late ,0,1"]);
    let set = ingest(content.as_bytes(), &IngestOptions::for_file("audit.csv"))?;
    assert_eq!(set.get(0).unwrap().status, FindingStatus::ClosedLate);
    Ok(())
}

#[test]
fn test_out_of_range_points_default_to_zero() -> Result<()> {
    let content = csv(&[
        "Ops,Q1,Ops,2024-01-01,,,,0,1e19",
        "Ops,Q2,Ops,2024-01-02,,,,0,5",
    ]);
    let set = ingest(content.as_bytes(), &IngestOptions::for_file("audit.csv"))?;
    assert_eq!(set.get(0).unwrap().points, 0);

    let board = compute_leaderboard(&set);
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].total_points, 5);
    assert_eq!(
        board.iter().map(|e| e.total_points).sum::<i64>(),
        set.iter().map(|f| f.points).sum::<i64>()
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_upload_clears_previous_findings() -> Result<()> {
    let good = temp_csv(&csv(&["Safety,Q1,Facilities,2024-01-01,,,,0,1"]))?;
    let session = IngestSession::default();
    let mut rx = session.subscribe();

    session.upload(&FileSource::new(good.path())).await?;
    assert!(matches!(rx.borrow_and_update().app, AppState::Ready { .. }));

    let bad = MemorySource::new(
        "bad.csv",
        "Category,Question,Responsible Team,Issue Finding Date,Issue Closed Date,Reopen Dates,Status,Accumulated Points\nSafety,Q,Team,2024-01-01,,,,1\n",
    );
    let err = session.upload(&bad).await.unwrap_err();
    assert!(matches!(err, IngestError::Schema { ref column } if column == "Reopen Count"));

    let state = rx.borrow_and_update().clone();
    assert!(state.app.findings().is_empty());
    assert_eq!(state.app.error(), Some(err.to_string().as_str()));
    Ok(())
}

#[tokio::test]
async fn test_unreadable_file_reports_read_failure() {
    let session = IngestSession::default();
    let dir = tempfile::tempdir().unwrap();
    let err = session
        .upload(&FileSource::new(dir.path().join("gone.csv")))
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Io(_)));
    assert_eq!(
        session.snapshot().app.error(),
        Some("Failed to read the file.")
    );
}
