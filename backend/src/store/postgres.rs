//! PostgreSQL-backed ledger store
//!
//! Stock is dated by the calculation's production date, not the intake date.
//! Rows without a production date are never stock.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{
    CalculationMode, CalculationRecord, DateWindow, IntakeHeader, IntakeProduct, IntakeSheet,
    PackingTypeDef, RecordNames, RegisterType, StockRecord, VirtualCategory,
};
use sqlx::{FromRow, PgPool};

use super::{LedgerStore, RecordQuery};
use crate::error::AppResult;

const PACKING_TYPES_SQL: &str = r#"
    SELECT pt.packmid AS packing_master_id,
           pt.packtmid AS slab_size_id,
           pt.packtmcode AS code,
           COALESCE(pt.packtmdesc, '') AS description
    FROM packingtypemaster pt
    WHERE COALESCE(pt.dispstatus, 0) = 0
      AND ($1::int IS NULL OR pt.packmid = $1)
    ORDER BY pt.packmid, pt.packtmcode, pt.packtmid
"#;

/// Columns of `transaction_product_calculation` decoded by `CalculationRow`
macro_rules! calculation_columns {
    () => {
        r#"
           tpc.tranpid AS row_id,
           tpc.trandid AS detail_line_id,
           tpc.packmid AS packing_master_id,
           COALESCE(tpc.packtmid, 0) AS slab_size_id,
           COALESCE(tpc.slabvalue, 0) AS slab_quantity,
           COALESCE(tpc.bkn, 0) AS broken_quantity,
           COALESCE(tpc.others, 0) AS others_quantity,
           COALESCE(tpc.kgwgt, 0) AS unit_weight,
           COALESCE(tpc.totalyeldcounts, 0) AS yield_counts,
           COALESCE(tpc.factorywgt, 0) AS factory_weight,
           COALESCE(tpc.pckbox, 0) AS pack_size,
           COALESCE(tpc.gradeid, 0) AS grade_id,
           COALESCE(tpc.pclrid, 0) AS colour_id,
           COALESCE(tpc.rcvdtid, 0) AS received_type_id,
           COALESCE(tpc.calculationmode, 0) AS calculation_mode,
           tpc.proddate::date AS production_date,
           COALESCE(tpc.dispstatus, 0) = 0 AS row_active
        "#
    };
}

const STOCK_RECORDS_SQL: &str = concat!(
    "SELECT",
    calculation_columns!(),
    r#",
           tm.catename AS supplier_name,
           COALESCE(tm.dispstatus, 0) = 0 AS header_active,
           COALESCE(pm.dispstatus, 0) = 0 AS packing_master_active,
           COALESCE(m.dispstatus, 0) = 0 AS product_active,
           m.mtrlid AS product_id,
           COALESCE(m.mtrldesc, '') AS product_name,
           tm.tranrefid AS supplier_id,
           tm.regstrid AS register_id,
           COALESCE(pm.packmdesc, '') AS packing_name,
           g.gradedesc AS grade_name,
           pclr.pclrdesc AS colour_name,
           r.rcvdtdesc AS received_type_name
    FROM transaction_product_calculation tpc
    INNER JOIN transactiondetail td ON tpc.trandid = td.trandid
    INNER JOIN transactionmaster tm ON td.tranmid = tm.tranmid
    INNER JOIN materialmaster m ON td.mtrlid = m.mtrlid
    INNER JOIN packingmaster pm ON tpc.packmid = pm.packmid
    LEFT JOIN grademaster g ON tpc.gradeid = g.gradeid
    LEFT JOIN productioncolourmaster pclr ON tpc.pclrid = pclr.pclrid
    LEFT JOIN receivedtypemaster r ON tpc.rcvdtid = r.rcvdtid
    WHERE tpc.proddate IS NOT NULL
      AND ($1::date IS NULL OR tpc.proddate::date <= $1)
      AND ($2::int IS NULL OR tm.tranrefid = $2)
      AND ($3::int IS NULL OR tpc.packmid = $3)
    ORDER BY tpc.trandid, tpc.packmid, tpc.packtmid, tpc.tranpid
"#
);

const INTAKE_HEADER_COLUMNS: &str = r#"
    SELECT tm.tranmid AS id,
           tm.trandno::text AS transaction_no,
           tm.trandate::date AS transaction_date,
           COALESCE(tm.catename, '') AS supplier_name,
           COALESCE(tm.catecode, '') AS supplier_code,
           COALESCE(tm.vechno, '') AS vehicle_no,
           COALESCE(tm.clientwght, 0) AS client_weight,
           COALESCE((SELECT SUM(td.mtrlnbox) FROM transactiondetail td
                     WHERE td.tranmid = tm.tranmid), 0)::bigint AS boxes
    FROM transactionmaster tm
"#;

const INTAKE_HEADERS_FILTER: &str = r#"
    WHERE tm.regstrid = $1
      AND COALESCE(tm.dispstatus, 0) = 0
      AND ($2::date IS NULL OR tm.trandate::date >= $2)
      AND ($3::date IS NULL OR tm.trandate::date <= $3)
    ORDER BY tm.trandate, tm.tranmid
"#;

const INTAKE_HEADER_FILTER: &str = "WHERE tm.tranmid = $1 AND tm.regstrid = $2";

const INTAKE_PRODUCTS_SQL: &str = r#"
    SELECT COALESCE(mg.mtrlgdesc, '') AS product_type,
           COALESCE(m.mtrldesc, '') AS product_name,
           COALESCE(td.mtrlnbox, 0)::int AS boxes,
           COALESCE(td.mtrlcounts, 0)::numeric AS counts_per_kg
    FROM transactiondetail td
    INNER JOIN materialgroupmaster mg ON td.mtrlgid = mg.mtrlgid
    INNER JOIN materialmaster m ON td.mtrlid = m.mtrlid
    WHERE td.tranmid = $1
    ORDER BY mg.mtrlgdesc, m.mtrldesc
"#;

const INTAKE_CALCULATIONS_SQL: &str = concat!(
    "SELECT",
    calculation_columns!(),
    r#"
    FROM transaction_product_calculation tpc
    WHERE tpc.tranmid = $1
      AND COALESCE(tpc.dispstatus, 0) = 0
      AND tpc.proddate IS NOT NULL
    ORDER BY tpc.proddate, tpc.trandid, tpc.packmid, tpc.packtmid, tpc.tranpid
"#
);

#[derive(Debug, FromRow)]
struct PackingTypeRow {
    packing_master_id: i32,
    slab_size_id: i32,
    code: i32,
    description: String,
}

#[derive(Debug, Clone, FromRow)]
struct CalculationRow {
    row_id: i32,
    detail_line_id: i32,
    packing_master_id: i32,
    slab_size_id: i32,
    slab_quantity: Decimal,
    broken_quantity: Decimal,
    others_quantity: Decimal,
    unit_weight: Decimal,
    yield_counts: Decimal,
    factory_weight: Decimal,
    pack_size: i32,
    grade_id: i32,
    colour_id: i32,
    received_type_id: i32,
    calculation_mode: i32,
    production_date: Option<NaiveDate>,
    row_active: bool,
}

impl CalculationRow {
    /// `None` when the row has no production date
    fn into_calculation(self, supplier_name: Option<String>) -> Option<CalculationRecord> {
        Some(CalculationRecord {
            row_id: self.row_id,
            detail_line_id: self.detail_line_id,
            packing_master_id: self.packing_master_id,
            slab_size_id: self.slab_size_id,
            slab_quantity: self.slab_quantity,
            broken_quantity: self.broken_quantity,
            others_quantity: self.others_quantity,
            unit_weight: self.unit_weight,
            yield_counts: self.yield_counts,
            factory_weight: self.factory_weight,
            pack_size: self.pack_size,
            grade_id: self.grade_id,
            colour_id: self.colour_id,
            received_type_id: self.received_type_id,
            supplier_name,
            calculation_mode: CalculationMode::from_code(self.calculation_mode),
            production_date: self.production_date?,
            active: self.row_active,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
struct StockRecordRow {
    #[sqlx(flatten)]
    calculation: CalculationRow,
    supplier_name: Option<String>,
    header_active: bool,
    packing_master_active: bool,
    product_active: bool,
    product_id: i32,
    product_name: String,
    supplier_id: Option<i32>,
    register_id: i32,
    packing_name: String,
    grade_name: Option<String>,
    colour_name: Option<String>,
    received_type_name: Option<String>,
}

impl StockRecordRow {
    /// `None` for registers the ledger does not report on, rows without a
    /// production date and products using a virtual category id
    fn into_record(self) -> Option<StockRecord> {
        let register_type = RegisterType::from_id(self.register_id)?;
        if VirtualCategory::from_product_id(self.product_id).is_some() {
            tracing::warn!(
                product_id = self.product_id,
                "Product uses a reserved virtual category id, row skipped"
            );
            return None;
        }

        let mut calculation = self.calculation.into_calculation(self.supplier_name)?;
        calculation.active = calculation.active
            && self.header_active
            && self.packing_master_active
            && self.product_active;

        Some(StockRecord {
            calculation,
            product_id: self.product_id,
            product_name: self.product_name,
            supplier_id: self.supplier_id,
            register_type,
            names: RecordNames {
                packing: self.packing_name,
                grade: self.grade_name,
                colour: self.colour_name,
                received_type: self.received_type_name,
            },
        })
    }
}

#[derive(Debug, FromRow)]
struct IntakeHeaderRow {
    id: i32,
    transaction_no: Option<String>,
    transaction_date: NaiveDate,
    supplier_name: String,
    supplier_code: String,
    vehicle_no: String,
    client_weight: Decimal,
    boxes: i64,
}

impl From<IntakeHeaderRow> for IntakeHeader {
    fn from(row: IntakeHeaderRow) -> Self {
        IntakeHeader {
            id: row.id,
            transaction_no: row.transaction_no,
            transaction_date: row.transaction_date,
            supplier_name: row.supplier_name,
            supplier_code: row.supplier_code,
            vehicle_no: row.vehicle_no,
            client_weight: row.client_weight,
            boxes: row.boxes,
        }
    }
}

#[derive(Debug, FromRow)]
struct IntakeProductRow {
    product_type: String,
    product_name: String,
    boxes: i32,
    counts_per_kg: Decimal,
}

/// Ledger store reading the calculation log tables
#[derive(Clone)]
pub struct PgLedgerStore {
    db: PgPool,
}

impl PgLedgerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn packing_types(&self, packing_master_id: Option<i32>) -> AppResult<Vec<PackingTypeDef>> {
        let rows = sqlx::query_as::<_, PackingTypeRow>(PACKING_TYPES_SQL)
            .bind(packing_master_id)
            .fetch_all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                PackingTypeDef::new(row.packing_master_id, row.slab_size_id, row.code, row.description)
            })
            .collect())
    }

    async fn stock_records(&self, query: &RecordQuery) -> AppResult<Vec<StockRecord>> {
        let rows = sqlx::query_as::<_, StockRecordRow>(STOCK_RECORDS_SQL)
            .bind(query.cutoff)
            .bind(query.supplier_id)
            .bind(query.packing_master_id)
            .fetch_all(&self.db)
            .await?;

        let fetched = rows.len();
        let records: Vec<StockRecord> = rows
            .into_iter()
            .filter_map(StockRecordRow::into_record)
            .collect();

        if records.len() < fetched {
            tracing::debug!(
                skipped = fetched - records.len(),
                "Skipped calculation rows outside the reported registers"
            );
        }

        Ok(records)
    }

    async fn intake_headers(&self, window: DateWindow) -> AppResult<Vec<IntakeHeader>> {
        let sql = format!("{INTAKE_HEADER_COLUMNS} {INTAKE_HEADERS_FILTER}");
        let rows = sqlx::query_as::<_, IntakeHeaderRow>(&sql)
            .bind(RegisterType::Intake.id())
            .bind(window.from)
            .bind(window.to)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(IntakeHeader::from).collect())
    }

    async fn intake_sheet(&self, header_id: i32) -> AppResult<Option<IntakeSheet>> {
        let sql = format!("{INTAKE_HEADER_COLUMNS} {INTAKE_HEADER_FILTER}");
        let Some(header) = sqlx::query_as::<_, IntakeHeaderRow>(&sql)
            .bind(header_id)
            .bind(RegisterType::Intake.id())
            .fetch_optional(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let products = sqlx::query_as::<_, IntakeProductRow>(INTAKE_PRODUCTS_SQL)
            .bind(header_id)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(|row| IntakeProduct {
                product_type: row.product_type,
                product_name: row.product_name,
                boxes: row.boxes,
                counts_per_kg: row.counts_per_kg,
            })
            .collect();

        let calculations = sqlx::query_as::<_, CalculationRow>(INTAKE_CALCULATIONS_SQL)
            .bind(header_id)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .filter_map(|row| row.into_calculation(None))
            .collect();

        Ok(Some(IntakeSheet {
            header: header.into(),
            products,
            calculations,
        }))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
