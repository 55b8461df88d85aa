use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use crate::outfmt::csv::CsvWriter;
use crate::outfmt::model::{OutputType, TableWriter};
use crate::outfmt::text::TextWriter;
use crate::render::render_sales;
use crate::spc::{load_book, SaleRecord};
use crate::util::rw::WriteHandle;
use crate::write_errln;

pub const DATA_DIR_ENV_VAR: &str = "MSSB_DATA";

/// Reads every stock plan sale confirmation book (Sale*.xls or Sale*.xlsx)
/// in a directory, and prints what was sold.
///
/// Books which can't be parsed are reported and skipped.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Directory containing the sale books
    #[arg(env = DATA_DIR_ENV_VAR)]
    pub dir: PathBuf,

    /// Print the complete records (including the RSU/ESPP lots) as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Print a text table instead of CSV. Ignored with --json
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Log progress to stderr. Equivalent to TRACE=spcfx=debug
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

pub fn is_sale_book(path: &Path) -> bool {
    let name = match path.file_name() {
        Some(n) => n.to_string_lossy(),
        None => return false,
    };
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.starts_with("Sale") && (ext == "xls" || ext == "xlsx")
}

/// Sale books in the directory, sorted by name.
pub fn sale_book_paths(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Unable to read directory {}: {}", dir.display(), e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| e.to_string())?.path();
        if path.is_file() && is_sale_book(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn write_output(args: &Args, sales: &[SaleRecord], mut out: WriteHandle, err: WriteHandle)
-> Result<(), String> {
    if args.json {
        serde_json::to_writer_pretty(out.clone(), sales).map_err(|e| e.to_string())?;
        return writeln!(out).map_err(|e| e.to_string());
    }
    let mut writer: Box<dyn TableWriter> = if args.pretty {
        Box::new(TextWriter::new(out))
    } else {
        Box::new(CsvWriter::new(out, err))
    };
    writer.print_render_table(
        OutputType::Sales, &args.dir.display().to_string(), &render_sales(sales))
}

pub fn run_with_args(args: Args, out: WriteHandle, mut err: WriteHandle) -> Result<(), ()> {
    let paths = sale_book_paths(&args.dir).map_err(|e| {
        write_errln!(err, "Error: {}", e);
    })?;
    info!("Found {} sale books in {}", paths.len(), args.dir.display());

    let mut sales = Vec::with_capacity(paths.len());
    let mut n_failed = 0;
    for path in &paths {
        match load_book(path) {
            Ok(sale) => sales.push(sale),
            Err(e) => {
                write_errln!(err, "Skipping {}: {}", path.display(), e);
                n_failed += 1;
            }
        }
    }

    write_output(&args, &sales, out, err.clone()).map_err(|e| {
        write_errln!(err, "Error writing output: {}", e);
    })?;

    if n_failed > 0 {
        write_errln!(err, "{} of {} books could not be read", n_failed, paths.len());
        Err(())
    } else {
        Ok(())
    }
}

pub fn run() -> Result<(), ()> {
    let args = Args::parse();
    if args.verbose {
        crate::tracing::enable_trace_env("spcfx=debug");
    }
    crate::tracing::setup_tracing();
    run_with_args(args, WriteHandle::stdout_write_handle(), WriteHandle::stderr_write_handle())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::is_sale_book;

    #[test]
    fn test_is_sale_book() {
        assert!(is_sale_book(Path::new("data/Sale123.xlsx")));
        assert!(is_sale_book(Path::new("Sale.XLS")));
        assert!(!is_sale_book(Path::new("data/Sale123.csv")));
        assert!(!is_sale_book(Path::new("data/Release123.xlsx")));
        assert!(!is_sale_book(Path::new("data/sale123.xlsx")));
        assert!(!is_sale_book(Path::new("data/")));
    }
}
