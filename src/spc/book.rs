use serde::Serialize;
use tracing::debug;

use crate::sheet::Workbook;

use super::{
    espp_sheet_to_espps, rsu_sheet_to_rsus, sale_sheet_to_dict, BookParseError,
    PlanType, Record, Value,
};

pub const SALE_SHEET_INDEX: usize = 0;
pub const DETAIL_SHEET_INDEX: usize = 1;

#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanDetails {
    Rsus(Vec<Record>),
    Espps(Vec<Record>),
}

impl PlanDetails {
    pub fn records(&self) -> &[Record] {
        match self {
            PlanDetails::Rsus(r) | PlanDetails::Espps(r) => r,
        }
    }
}

/// A complete sale: the fields of the sale sheet, plus the RSU or ESPP
/// lots the shares were drawn from.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct SaleRecord {
    pub fields: Record,
    pub plan_type: PlanType,
    pub details: PlanDetails,
    /// The file the book was loaded from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_file: Option<String>,
}

impl SaleRecord {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).and_then(|v| v.as_ref())
    }
}

pub fn book_to_sale(book: &Workbook) -> Result<SaleRecord, BookParseError> {
    let sale_sheet = book
        .sheet(SALE_SHEET_INDEX)
        .ok_or(BookParseError::MissingSheet(SALE_SHEET_INDEX))?;
    let fields = sale_sheet_to_dict(sale_sheet).map_err(BookParseError::SaleSheet)?;

    let plan_type = match fields.get("plan_type") {
        Some(Some(Value::PlanType(p))) => *p,
        _ => return Err(BookParseError::UnknownSaleType),
    };
    debug!(%plan_type, "book_to_sale");

    let detail_sheet = book
        .sheet(DETAIL_SHEET_INDEX)
        .ok_or(BookParseError::MissingSheet(DETAIL_SHEET_INDEX))?;
    let to_err = |source| BookParseError::DetailSheet { plan_type, source };
    let details = match plan_type {
        PlanType::Rsu => PlanDetails::Rsus(rsu_sheet_to_rsus(detail_sheet).map_err(to_err)?),
        PlanType::Espp => PlanDetails::Espps(espp_sheet_to_espps(detail_sheet).map_err(to_err)?),
    };

    Ok(SaleRecord { fields, plan_type, details, from_file: None })
}

/// Reads a sale book from an xls or xlsx file.
#[cfg(feature = "xlsx_read")]
pub fn load_book(path: &std::path::Path) -> Result<SaleRecord, BookParseError> {
    tracing::info!("Loading sale book {}", path.display());
    let book = crate::peripheral::excel::read_workbook(path).map_err(BookParseError::Read)?;
    let mut sale = book_to_sale(&book)?;
    sale.from_file = Some(path.display().to_string());
    Ok(sale)
}
