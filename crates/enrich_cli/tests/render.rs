use clap::Parser;
use enrich_cli::cli::{parse_mapping, Command, RootArgs};
use enrich_cli::render::{format_candidates, format_event, TerminalProgress};
use enrich_client::ProgressObserver;
use enrich_core::{resolve, ProgressEvent, TargetField};
use pretty_assertions::assert_eq;

#[test]
fn progress_line_shows_bar_counts_and_message() {
    let event = ProgressEvent::progress(5, 10, None, Some("Searching Acme".to_string()));
    assert_eq!(
        format_event(&event),
        "[###############...............]  50% 5/10 Searching Acme"
    );

    let full = ProgressEvent::progress(3, 3, Some(100), None);
    assert_eq!(format_event(&full), format!("[{}] 100% 3/3", "#".repeat(30)));
}

#[test]
fn terminal_events_are_one_line_each() {
    let progress = TerminalProgress::new(Vec::new());
    progress.on_event(&ProgressEvent::progress(0, 4, None, None));
    progress.on_event(&ProgressEvent::Failed {
        error_message: "disk full".to_string(),
    });

    let written = String::from_utf8(progress.into_inner()).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "failed: disk full");
}

#[test]
fn candidates_table_lists_every_column() {
    let columns = vec!["Company".to_string(), "Pays".to_string(), "Notes".to_string()];
    let candidates = resolve(&columns, Some("Company"), &["Pays".to_string()]);
    let table = format_candidates(&candidates);

    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("company name"), "{table}");
    assert!(lines[1].contains("country"), "{table}");
    assert!(lines[2].contains("ignore"), "{table}");
}

#[test]
fn mapping_flag_parses_source_and_target() {
    assert_eq!(
        parse_mapping("Raison sociale=company name").unwrap(),
        ("Raison sociale".to_string(), TargetField::CompanyName)
    );
    assert_eq!(
        parse_mapping("a=b=VAT").unwrap(),
        ("a=b".to_string(), TargetField::Vat)
    );
    assert!(parse_mapping("no separator").is_err());
    assert!(parse_mapping("=country").is_err());
    assert!(parse_mapping("Pays=continent").is_err());
}

#[test]
fn run_command_collects_repeated_mappings() {
    let args = RootArgs::try_parse_from([
        "enrich",
        "--base-url",
        "http://localhost:8000",
        "run",
        "clients.csv",
        "--map",
        "Pays=country",
        "--map",
        "Notes=ignore",
    ])
    .unwrap();

    assert_eq!(args.global.base_url.as_deref(), Some("http://localhost:8000"));
    match args.command {
        Command::Run(run) => {
            assert_eq!(run.file.to_str(), Some("clients.csv"));
            assert_eq!(
                run.mappings,
                vec![
                    ("Pays".to_string(), TargetField::Country),
                    ("Notes".to_string(), TargetField::Ignore),
                ]
            );
        }
        other => panic!("unexpected command {other:?}"),
    }
}
