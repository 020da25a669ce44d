use super::*;
use crate::core::types::Span;

fn ts(s: &str) -> Timestamp {
    parse_hms(s).unwrap()
}

fn row(title: &str, start: Option<&str>, end: Option<&str>, duration: Option<&str>) -> ScheduleRow {
    ScheduleRow {
        meta: TrackMeta {
            title: title.to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            genre: "Jazz".to_string(),
            date: "2021".to_string(),
            comment: "live".to_string(),
            track_number: 1,
        },
        start: start.map(ts),
        end: end.map(ts),
        duration: duration.map(ts),
    }
}

fn spans(records: &[TrackRecord]) -> Vec<(String, String)> {
    records
        .iter()
        .map(|r| (r.span.start.to_string(), r.span.end.to_string()))
        .collect()
}

#[test]
fn fully_explicit_schedule_is_unchanged() {
    let rows = vec![
        row("a", Some("00:00:00"), Some("00:02:00"), None),
        row("b", Some("00:02:00"), Some("00:05:10"), Some("00:09:00")),
        row("c", Some("00:07:00"), Some("00:08:00"), None),
    ];

    for policy in [CursorPolicy::InferredOnly, CursorPolicy::FollowExplicit] {
        let out = normalize(&rows, policy).unwrap();
        for (r, rec) in rows.iter().zip(&out) {
            assert_eq!(Some(rec.span.start), r.start);
            assert_eq!(Some(rec.span.end), r.end);
            assert_eq!(rec.meta, r.meta);
        }
    }
}

#[test]
fn inferred_start_continues_from_inferred_end() {
    let rows = vec![
        row("a", None, None, Some("00:03:00")),
        row("b", None, None, Some("00:04:15")),
        row("c", None, None, Some("00:00:45")),
    ];

    let out = normalize(&rows, CursorPolicy::InferredOnly).unwrap();
    assert_eq!(
        spans(&out),
        vec![
            ("00:00:00".into(), "00:03:00".into()),
            ("00:03:00".into(), "00:07:15".into()),
            ("00:07:15".into(), "00:08:00".into()),
        ]
    );
    for pair in out.windows(2) {
        assert_eq!(pair[0].span.end, pair[1].span.start);
    }
}

#[test]
fn duration_row_then_end_row_resolves_back_to_back() {
    let rows = vec![
        row("one", Some("00:00:00"), None, Some("00:01:30")),
        row("two", None, Some("00:03:00"), None),
    ];

    let out = normalize(&rows, CursorPolicy::InferredOnly).unwrap();
    assert_eq!(out[0].span.end, ts("00:01:30"));
    assert_eq!(out[1].span.start, ts("00:01:30"));
    assert_eq!(out[1].span.end, ts("00:03:00"));
}

#[test]
fn explicit_end_does_not_move_cursor_by_default() {
    let rows = vec![
        row("a", Some("00:00:00"), Some("00:02:00"), None),
        row("b", None, None, Some("00:01:00")),
    ];

    let out = normalize(&rows, CursorPolicy::InferredOnly).unwrap();
    assert_eq!(
        out[1].span,
        Span {
            start: ts("00:00:00"),
            end: ts("00:01:00")
        }
    );

    let out = normalize(&rows, CursorPolicy::FollowExplicit).unwrap();
    assert_eq!(
        out[1].span,
        Span {
            start: ts("00:02:00"),
            end: ts("00:03:00")
        }
    );
}

#[test]
fn inferred_end_measures_from_the_rows_own_start() {
    let rows = vec![row("a", Some("00:10:00"), None, Some("00:01:00"))];
    let out = normalize(&rows, CursorPolicy::InferredOnly).unwrap();
    assert_eq!(out[0].span.end, ts("00:11:00"));
}

#[test]
fn missing_end_and_duration_is_fatal() {
    let rows = vec![
        row("fine", None, None, Some("00:01:00")),
        row("broken", None, None, None),
        row("never reached", None, None, Some("00:01:00")),
    ];

    for _ in 0..2 {
        match normalize(&rows, CursorPolicy::InferredOnly) {
            Err(ScheduleError::MissingEnd { row, title }) => {
                assert_eq!(row, 2);
                assert_eq!(title, "broken");
            }
            other => panic!("expected MissingEnd, got {other:?}"),
        }
    }
}

#[test]
fn end_not_after_start_is_rejected() {
    let rows = vec![row("a", Some("00:02:00"), Some("00:02:00"), None)];
    assert!(matches!(
        normalize(&rows, CursorPolicy::InferredOnly),
        Err(ScheduleError::EmptySpan { row: 1, .. })
    ));
}

#[test]
fn empty_schedule_is_rejected() {
    assert!(matches!(
        normalize(&[], CursorPolicy::InferredOnly),
        Err(ScheduleError::Empty)
    ));
}

const HEADER: &str =
    "track,title,artist,album,genre,date,comment,start_HH:MM:SS,end_HH:MM:SS,duration_HH:MM:SS";

#[test]
fn reads_table_with_blank_timing_cells() {
    let csv = format!(
        "{HEADER}\n\
         1,Intro,Band,Live 99,Rock,1999,opener,00:00:00,,00:01:30\n\
         2,Outro,Band,Live 99,Rock,1999,,,00:03:00,\n"
    );

    let rows = read_schedule_from(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].meta.title, "Intro");
    assert_eq!(rows[0].start, Some(ts("00:00:00")));
    assert_eq!(rows[0].end, None);
    assert_eq!(rows[0].duration, Some(ts("00:01:30")));
    assert_eq!(rows[1].meta.comment, "");
    assert_eq!(rows[1].start, None);
    assert_eq!(rows[1].end, Some(ts("00:03:00")));
    assert_eq!(rows[1].meta.track_number, 2);
}

#[test]
fn numeric_text_fields_stay_text() {
    let csv = "track,title,artist,album,genre,date,comment,duration\n\
               3/12,1999,2Pac,1,80,2001,42,00:00:10\n";

    let rows = read_schedule_from(csv.as_bytes()).unwrap();
    let meta = &rows[0].meta;
    assert_eq!(meta.title, "1999");
    assert_eq!(meta.artist, "2Pac");
    assert_eq!(meta.album, "1");
    assert_eq!(meta.genre, "80");
    assert_eq!(meta.date, "2001");
    assert_eq!(meta.comment, "42");
    assert_eq!(meta.track_number, 3);
}

#[test]
fn short_column_aliases_and_extra_columns_are_accepted() {
    let csv = "track_number,title,artist,album,genre,date,comment,start,end,notes\n\
               1,A,B,C,D,E,F,00:00:05,00:00:09,ignored\n";

    let rows = read_schedule_from(csv.as_bytes()).unwrap();
    assert_eq!(rows[0].start, Some(ts("00:00:05")));
    assert_eq!(rows[0].end, Some(ts("00:00:09")));
    assert_eq!(rows[0].duration, None);
}

#[test]
fn missing_columns_are_named() {
    let csv = "title,artist,album,date\nA,B,C,D\n";

    match read_schedule_from(csv.as_bytes()) {
        Err(ScheduleError::MissingColumns(cols)) => {
            assert_eq!(cols, vec!["genre", "comment", "track"]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn bad_timestamp_names_row_and_column() {
    let csv = format!("{HEADER}\n1,A,B,C,D,E,F,00:00:00,,1m30s\n");

    match read_schedule_from(csv.as_bytes()) {
        Err(ScheduleError::BadTimestamp { row, column, value }) => {
            assert_eq!(row, 1);
            assert_eq!(column, "duration_HH:MM:SS");
            assert_eq!(value, "1m30s");
        }
        other => panic!("expected BadTimestamp, got {other:?}"),
    }
}

#[test]
fn non_positive_track_number_is_rejected() {
    for track in ["0", "x", ""] {
        let csv = format!("{HEADER}\n{track},A,B,C,D,E,F,,,00:00:01\n");
        assert!(
            matches!(
                read_schedule_from(csv.as_bytes()),
                Err(ScheduleError::BadTrackNumber { row: 1, .. })
            ),
            "track {track:?} should be rejected"
        );
    }
}

#[test]
fn header_only_table_is_empty() {
    assert!(matches!(
        read_schedule_from(format!("{HEADER}\n").as_bytes()),
        Err(ScheduleError::Empty)
    ));
}

#[test]
fn load_schedule_reads_and_normalizes_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.csv");
    std::fs::write(
        &path,
        format!(
            "{HEADER}\n\
             1,One,X,Y,Z,2020,c,00:00:00,,00:01:30\n\
             2,Two,X,Y,Z,2020,c,,00:03:00,\n"
        ),
    )
    .unwrap();

    let records = load_schedule(&path, CursorPolicy::InferredOnly).unwrap();
    assert_eq!(
        spans(&records),
        vec![
            ("00:00:00".into(), "00:01:30".into()),
            ("00:01:30".into(), "00:03:00".into()),
        ]
    );
    assert_eq!(records[1].index, 1);
}

#[test]
fn missing_schedule_file_reports_path() {
    let err = read_schedule(std::path::Path::new("/definitely/not/here.csv")).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.csv"));
}
