use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use backlog_core::{
    process_response, run, BacklogColumn, BacklogPipeline, DateLocalizer, GenerationError,
    MonthTable, PipelineError, ResponseError, TextGenerator, INDONESIAN_MONTHS,
};

const RAW_BACKLOG: &str = "Fix login bug\tAlice\tIn Progress\t2 Juni 2025\t5 Juni 2025";

const REPLY: &str = "Epic|Backlog|PIC|Status|Start Date|End Date\n\
                     Authentication|Fix login bug|Alice|In Progress|2 Juni 2025|5 Juni 2025";

/// Returns a canned reply and counts how often it was asked.
struct CannedReply {
    reply: &'static str,
    calls: Rc<Cell<usize>>,
}

impl CannedReply {
    fn new(reply: &'static str) -> Self {
        Self {
            reply,
            calls: Rc::default(),
        }
    }

    fn call_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl TextGenerator for CannedReply {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.reply.to_string())
    }
}

#[test]
fn end_to_end_single_row() -> Result<()> {
    let generator = CannedReply::new(REPLY);
    let calls = generator.call_counter();
    let pipeline = BacklogPipeline::new(generator);
    let table = pipeline.run(RAW_BACKLOG)?.expect("pipeline should produce a table");

    assert_eq!(calls.get(), 1);
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.rows()[0],
        [
            "Authentication",
            "Fix login bug",
            "Alice",
            "In Progress",
            "02 June 2025",
            "05 June 2025"
        ]
        .map(str::to_string)
    );
    assert_eq!(
        table.to_tsv()?,
        "Epic\tBacklog\tPIC\tStatus\tStart Date\tEnd Date\n\
         Authentication\tFix login bug\tAlice\tIn Progress\t02 June 2025\t05 June 2025\n"
    );
    Ok(())
}

#[test]
fn generator_receives_the_raw_backlog_text() -> Result<()> {
    let seen = std::cell::RefCell::new(String::new());
    let generator = |prompt: &str| -> Result<String, GenerationError> {
        seen.replace(prompt.to_string());
        Ok(REPLY.to_string())
    };

    let table = run(RAW_BACKLOG, generator)?;

    assert!(table.is_some());
    assert_eq!(seen.borrow().as_str(), RAW_BACKLOG);
    Ok(())
}

#[test]
fn quota_failure_propagates() {
    let generator = |_: &str| -> Result<String, GenerationError> {
        Err(GenerationError::quota_exceeded("429 RESOURCE_EXHAUSTED"))
    };
    let pipeline = BacklogPipeline::new(generator);

    let err = pipeline
        .run(RAW_BACKLOG)
        .expect_err("quota errors must reach the caller");
    assert!(err.is_quota_exceeded());
    assert!(matches!(err, PipelineError::QuotaExceeded { message } if message.contains("429")));
}

#[test]
fn other_generator_failures_yield_no_result() -> Result<()> {
    let generator = |_: &str| -> Result<String, GenerationError> {
        Err(GenerationError::failed("connection reset"))
    };
    let pipeline = BacklogPipeline::new(generator);

    assert!(pipeline.run(RAW_BACKLOG)?.is_none());
    assert!(matches!(
        pipeline.try_run(RAW_BACKLOG),
        Err(PipelineError::Generation { .. })
    ));
    Ok(())
}

#[test]
fn blank_input_is_rejected_before_generation() -> Result<()> {
    let generator = CannedReply::new(REPLY);
    let calls = generator.call_counter();
    let pipeline = BacklogPipeline::new(generator);

    assert!(pipeline.run("  \n\t ")?.is_none());
    assert!(matches!(
        pipeline.try_run(""),
        Err(PipelineError::EmptyInput)
    ));
    assert_eq!(calls.get(), 0);
    Ok(())
}

#[test]
fn blank_or_unparsable_replies_yield_no_result() -> Result<()> {
    for reply in ["", "   ", "Maaf, saya tidak dapat membantu.", "Epic|Backlog|PIC"] {
        let pipeline = BacklogPipeline::new(CannedReply::new(reply));
        assert!(
            pipeline.run(RAW_BACKLOG)?.is_none(),
            "reply {reply:?} should not produce a table"
        );
    }

    let pipeline = BacklogPipeline::new(CannedReply::new(""));
    assert!(matches!(
        pipeline.try_run(RAW_BACKLOG),
        Err(PipelineError::UnparsableResponse(ResponseError::EmptyResponse))
    ));
    Ok(())
}

#[test]
fn one_ragged_row_discards_the_table() -> Result<()> {
    let reply = "Epic|Backlog|PIC|Status|Start Date|End Date\n\
                 Auth|Login|Alice|Done|2 Juni 2025|3 Juni 2025\n\
                 Auth|Logout|Alice|Done|4 Juni 2025";
    let pipeline = BacklogPipeline::new(CannedReply::new(reply));

    assert!(pipeline.run(RAW_BACKLOG)?.is_none());
    Ok(())
}

#[test]
fn groups_by_epic_and_orders_by_start_date() -> Result<()> {
    let reply = "```csv\n\
                 Epic|Backlog|PIC|Status|Start Date|End Date\n\
                 Reporting|Export PDF|Citra|To Do|1 Agustus 2025|15 Agustus 2025\n\
                 Authentication|Reset password|Budi|To Do|segera|\n\
                 Authentication|Fix login bug|Alice|In Progress|2 Juni 2025|5 Juni 2025\n\
                 Reporting|Dashboard|Dewi|Done|3 Maret 2025|20 Maret 2025\n\
                 Authentication|SSO|Alice|To Do|1 Januari 2025|sometime\n\
                 ```";
    let pipeline = BacklogPipeline::new(CannedReply::new(reply));
    let table = pipeline.run(RAW_BACKLOG)?.expect("table");

    let order: Vec<&str> = table.column(BacklogColumn::Backlog).collect();
    assert_eq!(
        order,
        vec![
            "SSO",
            "Fix login bug",
            "Reset password",
            "Dashboard",
            "Export PDF"
        ]
    );

    let starts: Vec<&str> = table.column(BacklogColumn::StartDate).collect();
    assert_eq!(
        starts,
        vec![
            "01 January 2025",
            "02 June 2025",
            "",
            "03 March 2025",
            "01 August 2025"
        ]
    );

    // Unrecognized end date on a dated row renders empty, row intact.
    assert_eq!(table.rows()[0][5], "");
    assert_eq!(table.rows()[0][2], "Alice");

    for row in table.rows() {
        for cell in row {
            assert!(!matches!(cell.as_str(), "null" | "NaN" | "None" | "nan"));
        }
    }
    Ok(())
}

static ENGLISH_MONTHS: MonthTable = MonthTable {
    locale: "en",
    months: [
        ("january", "January"),
        ("february", "February"),
        ("march", "March"),
        ("april", "April"),
        ("may", "May"),
        ("june", "June"),
        ("july", "July"),
        ("august", "August"),
        ("september", "September"),
        ("october", "October"),
        ("november", "November"),
        ("december", "December"),
    ],
};

#[test]
fn extra_locale_tables_resolve_more_dates() -> Result<()> {
    let reply = "Epic|Backlog|PIC|Status|Start Date|End Date\n\
                 Auth|Login|Alice|Done|2 June 2025|3 Juni 2025";

    let default = BacklogPipeline::new(CannedReply::new(reply));
    let table = default.run(RAW_BACKLOG)?.expect("table");
    assert_eq!(table.rows()[0][4], "");
    assert_eq!(table.rows()[0][5], "03 June 2025");

    let bilingual = BacklogPipeline::new(CannedReply::new(reply))
        .with_localizer(DateLocalizer::new(vec![&INDONESIAN_MONTHS, &ENGLISH_MONTHS]));
    let table = bilingual.run(RAW_BACKLOG)?.expect("table");
    assert_eq!(table.rows()[0][4], "02 June 2025");
    assert_eq!(table.rows()[0][5], "03 June 2025");
    Ok(())
}

#[test]
fn blank_epic_rows_are_kept_and_sort_first() -> Result<()> {
    let reply = "Epic|Backlog|PIC|Status|Start Date|End Date\n\
                 Auth|Login|Alice|Done|2 Juni 2025|3 Juni 2025\n\
                 |||||\n\
                 |Orphan task|Budi|To Do|1 Mei 2025|";
    let table = process_response(reply, &DateLocalizer::default())?;

    assert_eq!(table.len(), 3);
    assert_eq!(
        table.rows()[0],
        ["", "Orphan task", "Budi", "To Do", "01 May 2025", ""].map(str::to_string)
    );
    assert_eq!(table.rows()[1], ["", "", "", "", "", ""].map(str::to_string));
    assert_eq!(table.rows()[2][0], "Auth");
    Ok(())
}
