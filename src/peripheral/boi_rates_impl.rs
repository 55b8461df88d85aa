use std::path::PathBuf;

use clap::Parser;
use time::Date;

use crate::fx::{boi, DailyRate, FxSingle};
use crate::outfmt::csv::CsvWriter;
use crate::outfmt::model::{OutputType, TableWriter};
use crate::outfmt::text::TextWriter;
use crate::render::{render_all_rates, render_rate_series, RenderTable};
use crate::util::date::parse_iso_date;
use crate::util::rw::WriteHandle;
use crate::write_errln;

/// Prints exchange rates from a central bank rates workbook.
///
/// Without --symbol, prints every currency's rates, one row per date.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Rates workbook (.xls or .xlsx), or a tab separated (.tsv) export of
    /// its first sheet
    #[arg(required = true)]
    pub file: PathBuf,

    /// Print only this currency's rates (eg. USD)
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// First date to print, as YYYY-MM-DD. Requires --symbol
    #[arg(long, requires = "symbol", value_parser = parse_iso_date)]
    pub start: Option<Date>,

    /// Last date to print (inclusive), as YYYY-MM-DD. Requires --symbol
    #[arg(long, requires = "symbol", value_parser = parse_iso_date)]
    pub end: Option<Date>,

    /// Print a text table instead of CSV
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Log progress to stderr. Equivalent to TRACE=spcfx=debug
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

fn single_rates_table(args: &Args, symbol: &str) -> Result<RenderTable, crate::fx::Error> {
    let store = boi::load_single(&args.file, symbol)?;
    let (first, last) = match (store.first_date(), store.last_date()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Ok(render_rate_series(Vec::<DailyRate>::new())),
    };
    let start = args.start.unwrap_or(first);
    let end = args.end.unwrap_or(last);
    let mut table = render_rate_series(store.iter_rates_over_date_range(start, end));
    if table.rows.is_empty() {
        table.notes.push(format!("No {} rates between {} and {}", store.symbol(), start, end));
    }
    Ok(table)
}

fn all_rates_table(args: &Args) -> Result<RenderTable, crate::fx::Error> {
    Ok(render_all_rates(boi::parse_all(boi::iter_excel(&args.file)?)))
}

pub fn run_with_args(args: Args, out: WriteHandle, mut err: WriteHandle) -> Result<(), ()> {
    let (res, out_type, name) = match &args.symbol {
        Some(sym) => (single_rates_table(&args, sym), OutputType::Rates, sym.trim().to_uppercase()),
        None => (all_rates_table(&args), OutputType::AllRates, String::new()),
    };
    let table = match res {
        Ok(t) => t,
        Err(e) => {
            write_errln!(err, "Error: {}", e);
            return Err(());
        }
    };

    let mut writer: Box<dyn TableWriter> = if args.pretty {
        Box::new(TextWriter::new(out))
    } else {
        Box::new(CsvWriter::new(out, err.clone()))
    };
    writer.print_render_table(out_type, &name, &table).map_err(|e| {
        write_errln!(err, "Error writing output: {}", e);
    })
}

pub fn run() -> Result<(), ()> {
    let args = Args::parse();
    if args.verbose {
        crate::tracing::enable_trace_env("spcfx=debug");
    }
    crate::tracing::setup_tracing();
    run_with_args(args, WriteHandle::stdout_write_handle(), WriteHandle::stderr_write_handle())
}
