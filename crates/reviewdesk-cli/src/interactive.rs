//! Line-oriented interactive session over a [`Dashboard`].

use std::io::{BufRead, Write};
use std::path::PathBuf;

use reviewdesk_core::{ColumnSet, DateQuery};

use crate::dashboard::Dashboard;
use crate::report;

const HELP: &str = "\
commands:
  date YYYY-MM-DD        set the review date
  fetch [YYYY-MM-DD]     fetch records for the review date
  records                list fetched records
  select <id>            choose the record to inspect
  table [strict|rich]    show the selected record's findings
  csv [dir]              export findings to compliance_<id>.csv
  pdf [minutes]          signed link to the source PDF
  help                   this text
  quit                   end the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Date(DateQuery),
    Fetch(Option<DateQuery>),
    Records,
    Select(String),
    Table(ColumnSet),
    Csv(PathBuf),
    Pdf(Option<u64>),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    let date = |s: &str| {
        s.parse::<DateQuery>()
            .map_err(|e| format!("bad date `{s}`: {e} (expected YYYY-MM-DD)"))
    };
    let command = match verb.to_ascii_lowercase().as_str() {
        "date" => Command::Date(date(arg.ok_or("usage: date YYYY-MM-DD")?)?),
        "fetch" => Command::Fetch(arg.map(date).transpose()?),
        "records" | "ls" => Command::Records,
        "select" => Command::Select(arg.ok_or("usage: select <id>")?.to_string()),
        "table" | "show" => Command::Table(
            arg.map(str::parse::<ColumnSet>)
                .transpose()?
                .unwrap_or_default(),
        ),
        "csv" | "export" => {
            Command::Csv(arg.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")))
        }
        "pdf" => Command::Pdf(
            arg.map(|m| m.parse::<u64>().map_err(|e| format!("bad minutes `{m}`: {e}")))
                .transpose()?,
        ),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };
    Ok(Some(command))
}

/// Run until `quit` or end of input. The dashboard's session cache lives
/// exactly as long as this loop.
pub async fn run<R: BufRead, W: Write>(
    dashboard: &mut Dashboard,
    today: DateQuery,
    input: R,
    mut prompt: W,
) -> anyhow::Result<()> {
    let mut date = today;
    println!("review date {}; `fetch` to load records, `help` for commands", date.day());
    write!(prompt, "> ")?;
    prompt.flush()?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = execute(dashboard, &mut date, command).await {
                    eprintln!("error: {e:#}");
                }
            }
            Err(msg) => eprintln!("{msg}"),
        }
        write!(prompt, "> ")?;
        prompt.flush()?;
    }
    Ok(())
}

async fn execute(
    dashboard: &mut Dashboard,
    date: &mut DateQuery,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Date(d) => {
            *date = d;
            println!("review date {}", d.day());
        }
        Command::Fetch(d) => {
            if let Some(d) = d {
                *date = d;
            }
            report::fetch(dashboard, *date).await?;
        }
        Command::Records => report::records(dashboard),
        Command::Select(id) => {
            let doc = dashboard.select(&id)?;
            crate::display::print_record_header(doc);
        }
        Command::Table(columns) => report::findings(dashboard, columns)?,
        Command::Csv(dir) => report::export(dashboard, &dir, ColumnSet::Strict)?,
        Command::Pdf(minutes) => {
            let expires = dashboard.link_expiry(minutes)?;
            report::pdf_link(dashboard, expires);
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}
