//! Database service for commerce-service.
//!
//! All mutations that touch derived receipt fields run as a single
//! transaction: persist the child row, re-derive the parent's total /
//! collected / status, persist the parent, commit. A failed derivation rolls
//! the triggering write back.

use crate::models::{
    next_receipt_number, AttendanceFilter, AttendanceRecord, Client, CreateAttendance,
    CreateClient, CreateExpense, CreateLineItem, CreatePayment, CreateProduct, CreateReceipt,
    CreateStaff, CreateVendor, Expense, ExpenseReportRow, LineItem, ListExpensesFilter,
    ListReceiptsFilter, PaymentStatus, Payment, PeriodSummary, Product, Receipt,
    ReceiptDocument, ReceiptReportRow, ReportRows, Staff, UpdateClient, UpdateExpense,
    UpdateLineItem, UpdateProduct, UpdateReceipt, UpdateVendor, Vendor,
};
use crate::registry;
use crate::services::metrics::{
    DB_QUERY_DURATION, ERRORS_TOTAL, PAYMENT_AMOUNT_TOTAL, RECEIPTS_TOTAL,
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

const RECEIPT_COLUMNS: &str = "receipt_id, client_id, staff_id, receipt_number, receipt_year, \
     issue_date, delivery_address, total_sale, status, collected, notes, created_utc";

const PRODUCT_COLUMNS: &str = "product_id, name, unit_price, stock, created_utc";

/// Lock class for per-year receipt-number serialization.
const RECEIPT_NUMBER_LOCK_CLASS: i32 = 0x5245;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "commerce-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Catalog (products)
    // -------------------------------------------------------------------------

    /// Create a product.
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: &CreateProduct) -> Result<Product, AppError> {
        if input.unit_price < Decimal::ZERO {
            ERRORS_TOTAL.with_label_values(&["validation_error"]).inc();
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unit price must not be negative"
            )));
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (product_id, name, unit_price, stock) \
             VALUES ($1, $2, $3, $4) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.unit_price)
        .bind(input.stock)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create product: {}", e)))?;

        info!(product_id = %product.product_id, name = %product.name, "Product created");

        Ok(product)
    }

    /// Get a product by ID.
    pub async fn get_product(&self, product_id: Uuid) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get product: {}", e)))
    }

    /// List all products by name.
    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list products: {}", e)))
    }

    /// Update catalog fields of a product. Does not touch existing line
    /// items; their applied prices stay frozen.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, AppError> {
        if let Some(price) = input.unit_price {
            if price < Decimal::ZERO {
                ERRORS_TOTAL.with_label_values(&["validation_error"]).inc();
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Unit price must not be negative"
                )));
            }
        }

        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 unit_price = COALESCE($3, unit_price), \
                 stock = COALESCE($4, stock) \
             WHERE product_id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product_id)
        .bind(input.name.as_deref())
        .bind(input.unit_price)
        .bind(input.stock)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update product: {}", e)))
    }

    /// Delete a product. Rejected while any line item references it.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::Conflict(anyhow::anyhow!(
                        "Product is referenced by line items and cannot be deleted"
                    ))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to delete product: {}", e)),
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Products at or below the stock threshold, lowest first.
    pub async fn low_stock(&self, threshold: i32) -> Result<Vec<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock <= $1 ORDER BY stock ASC"
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to query low stock: {}", e))
        })
    }

    // -------------------------------------------------------------------------
    // Parties (clients, vendors, staff)
    // -------------------------------------------------------------------------

    /// Create a client.
    #[instrument(skip(self, input))]
    pub async fn create_client(&self, input: &CreateClient) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            "INSERT INTO clients (client_id, contact_name, company_name, phone, address, city) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'Lima')) \
             RETURNING client_id, contact_name, company_name, phone, address, city, created_utc",
        )
        .bind(Uuid::new_v4())
        .bind(&input.contact_name)
        .bind(input.company_name.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.address.as_deref())
        .bind(input.city.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create client: {}", e)))?;

        info!(client_id = %client.client_id, "Client created");

        Ok(client)
    }

    /// Get a client by ID.
    pub async fn get_client(&self, client_id: Uuid) -> Result<Option<Client>, AppError> {
        sqlx::query_as::<_, Client>(
            "SELECT client_id, contact_name, company_name, phone, address, city, created_utc \
             FROM clients WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get client: {}", e)))
    }

    /// List all clients by contact name.
    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        sqlx::query_as::<_, Client>(
            "SELECT client_id, contact_name, company_name, phone, address, city, created_utc \
             FROM clients ORDER BY contact_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list clients: {}", e)))
    }

    /// Update a client.
    #[instrument(skip(self, input))]
    pub async fn update_client(
        &self,
        client_id: Uuid,
        input: &UpdateClient,
    ) -> Result<Option<Client>, AppError> {
        sqlx::query_as::<_, Client>(
            "UPDATE clients SET \
                 contact_name = COALESCE($2, contact_name), \
                 company_name = COALESCE($3, company_name), \
                 phone = COALESCE($4, phone), \
                 address = COALESCE($5, address), \
                 city = COALESCE($6, city) \
             WHERE client_id = $1 \
             RETURNING client_id, contact_name, company_name, phone, address, city, created_utc",
        )
        .bind(client_id)
        .bind(input.contact_name.as_deref())
        .bind(input.company_name.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.address.as_deref())
        .bind(input.city.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update client: {}", e)))
    }

    /// Delete a client. Rejected while any receipt references them.
    #[instrument(skip(self))]
    pub async fn delete_client(&self, client_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE client_id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::Conflict(anyhow::anyhow!(
                        "Client is referenced by receipts and cannot be deleted"
                    ))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to delete client: {}", e)),
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Create a vendor.
    #[instrument(skip(self, input))]
    pub async fn create_vendor(&self, input: &CreateVendor) -> Result<Vendor, AppError> {
        let vendor = sqlx::query_as::<_, Vendor>(
            "INSERT INTO vendors (vendor_id, name, kind, tax_id, phone) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING vendor_id, name, kind, tax_id, phone, created_utc",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.kind.as_str())
        .bind(input.tax_id.as_deref())
        .bind(input.phone.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create vendor: {}", e)))?;

        info!(vendor_id = %vendor.vendor_id, name = %vendor.name, "Vendor created");

        Ok(vendor)
    }

    /// Get a vendor by ID.
    pub async fn get_vendor(&self, vendor_id: Uuid) -> Result<Option<Vendor>, AppError> {
        sqlx::query_as::<_, Vendor>(
            "SELECT vendor_id, name, kind, tax_id, phone, created_utc \
             FROM vendors WHERE vendor_id = $1",
        )
        .bind(vendor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get vendor: {}", e)))
    }

    /// List all vendors by name.
    pub async fn list_vendors(&self) -> Result<Vec<Vendor>, AppError> {
        sqlx::query_as::<_, Vendor>(
            "SELECT vendor_id, name, kind, tax_id, phone, created_utc \
             FROM vendors ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list vendors: {}", e)))
    }

    /// Update a vendor.
    #[instrument(skip(self, input))]
    pub async fn update_vendor(
        &self,
        vendor_id: Uuid,
        input: &UpdateVendor,
    ) -> Result<Option<Vendor>, AppError> {
        sqlx::query_as::<_, Vendor>(
            "UPDATE vendors SET \
                 name = COALESCE($2, name), \
                 kind = COALESCE($3, kind), \
                 tax_id = COALESCE($4, tax_id), \
                 phone = COALESCE($5, phone) \
             WHERE vendor_id = $1 \
             RETURNING vendor_id, name, kind, tax_id, phone, created_utc",
        )
        .bind(vendor_id)
        .bind(input.name.as_deref())
        .bind(input.kind.map(|k| k.as_str()))
        .bind(input.tax_id.as_deref())
        .bind(input.phone.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update vendor: {}", e)))
    }

    /// Delete a vendor. Rejected while any expense references them.
    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, vendor_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vendors WHERE vendor_id = $1")
            .bind(vendor_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::Conflict(anyhow::anyhow!(
                        "Vendor is referenced by expenses and cannot be deleted"
                    ))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to delete vendor: {}", e)),
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Create a staff member.
    #[instrument(skip(self, input))]
    pub async fn create_staff(&self, input: &CreateStaff) -> Result<Staff, AppError> {
        let staff = sqlx::query_as::<_, Staff>(
            "INSERT INTO staff (staff_id, name, phone, hourly_rate) \
             VALUES ($1, $2, $3, $4) \
             RETURNING staff_id, name, phone, hourly_rate, created_utc",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.phone.as_deref())
        .bind(input.hourly_rate)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create staff: {}", e)))?;

        info!(staff_id = %staff.staff_id, "Staff member created");

        Ok(staff)
    }

    /// List staff members.
    pub async fn list_staff(&self) -> Result<Vec<Staff>, AppError> {
        sqlx::query_as::<_, Staff>(
            "SELECT staff_id, name, phone, hourly_rate, created_utc FROM staff ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list staff: {}", e)))
    }

    /// Delete a staff member. Receipts keep their history with a nulled
    /// reference; attendance records are removed.
    #[instrument(skip(self))]
    pub async fn delete_staff(&self, staff_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM staff WHERE staff_id = $1")
            .bind(staff_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete staff: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Receipts
    // -------------------------------------------------------------------------

    /// Create a delivery receipt.
    ///
    /// When no number is supplied one is assigned from the per-year sequence.
    /// Assignment runs under a per-year advisory lock inside the insert
    /// transaction so concurrent creations cannot compute the same number.
    #[instrument(skip(self, input), fields(client_id = %input.client_id))]
    pub async fn create_receipt(&self, input: &CreateReceipt) -> Result<Receipt, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_receipt"])
            .start_timer();

        let issue_date = input
            .issue_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let year = issue_date.year();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let receipt_number = match &input.receipt_number {
            Some(number) => number.clone(),
            None => {
                sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
                    .bind(RECEIPT_NUMBER_LOCK_CLASS)
                    .bind(year)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::DatabaseError(anyhow::anyhow!(
                            "Failed to take numbering lock: {}",
                            e
                        ))
                    })?;

                // Explicit numbers may be free-form; only numeric ones
                // participate in the sequence, compared as integers.
                let current_max = sqlx::query_scalar::<_, Option<String>>(
                    "SELECT MAX(receipt_number::bigint)::text FROM receipts \
                     WHERE receipt_year = $1 AND receipt_number ~ '^[0-9]+$'",
                )
                .bind(year)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to read receipt sequence: {}",
                        e
                    ))
                })?;

                next_receipt_number(current_max.as_deref())
            }
        };

        let receipt = sqlx::query_as::<_, Receipt>(&format!(
            "INSERT INTO receipts \
                 (receipt_id, client_id, staff_id, receipt_number, receipt_year, issue_date, \
                  delivery_address, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'No returns.')) \
             RETURNING {RECEIPT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(input.client_id)
        .bind(input.staff_id)
        .bind(&receipt_number)
        .bind(year)
        .bind(issue_date)
        .bind(&input.delivery_address)
        .bind(input.notes.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                ERRORS_TOTAL.with_label_values(&["conflict"]).inc();
                AppError::Conflict(anyhow::anyhow!(
                    "Receipt number '{}' already exists for {}",
                    receipt_number,
                    year
                ))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(anyhow::anyhow!("Client or staff member not found"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create receipt: {}", e)),
        })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        RECEIPTS_TOTAL
            .with_label_values(&[receipt.status.as_str()])
            .inc();

        info!(
            receipt_id = %receipt.receipt_id,
            receipt_number = %receipt.receipt_number,
            year = receipt.receipt_year,
            "Receipt created"
        );

        Ok(receipt)
    }

    /// Get a receipt by ID.
    pub async fn get_receipt(&self, receipt_id: Uuid) -> Result<Option<Receipt>, AppError> {
        sqlx::query_as::<_, Receipt>(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipts WHERE receipt_id = $1"
        ))
        .bind(receipt_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get receipt: {}", e)))
    }

    /// Get a receipt with its line items and payments, for document
    /// rendering.
    #[instrument(skip(self))]
    pub async fn get_receipt_document(
        &self,
        receipt_id: Uuid,
    ) -> Result<Option<ReceiptDocument>, AppError> {
        let Some(receipt) = self.get_receipt(receipt_id).await? else {
            return Ok(None);
        };

        let line_items = sqlx::query_as::<_, LineItem>(
            "SELECT line_item_id, receipt_id, product_id, quantity, applied_price, created_utc \
             FROM line_items WHERE receipt_id = $1 ORDER BY created_utc",
        )
        .bind(receipt_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get line items: {}", e)))?;

        let payments = sqlx::query_as::<_, Payment>(
            "SELECT payment_id, receipt_id, pay_date, amount, bank_reference, created_utc \
             FROM payments WHERE receipt_id = $1 ORDER BY pay_date, created_utc",
        )
        .bind(receipt_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get payments: {}", e)))?;

        Ok(Some(ReceiptDocument {
            receipt,
            line_items,
            payments,
        }))
    }

    /// List receipts, newest first.
    pub async fn list_receipts(
        &self,
        filter: &ListReceiptsFilter,
    ) -> Result<Vec<Receipt>, AppError> {
        sqlx::query_as::<_, Receipt>(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipts \
             WHERE ($1::date IS NULL OR issue_date >= $1) \
               AND ($2::date IS NULL OR issue_date <= $2) \
               AND ($3::int4 IS NULL OR receipt_year = $3) \
               AND ($4::text IS NULL OR status = $4) \
               AND ($5::uuid IS NULL OR client_id = $5) \
             ORDER BY issue_date DESC, receipt_number DESC"
        ))
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.year)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list receipts: {}", e)))
    }

    /// Edit receipt header fields. Never touches the derived total,
    /// collected amount or status, and never reassigns the number.
    #[instrument(skip(self, input))]
    pub async fn update_receipt(
        &self,
        receipt_id: Uuid,
        input: &UpdateReceipt,
    ) -> Result<Option<Receipt>, AppError> {
        let (set_staff, staff_id) = match input.staff_id {
            Some(value) => (true, value),
            None => (false, None),
        };

        sqlx::query_as::<_, Receipt>(&format!(
            "UPDATE receipts SET \
                 staff_id = CASE WHEN $2 THEN $3 ELSE staff_id END, \
                 issue_date = COALESCE($4, issue_date), \
                 delivery_address = COALESCE($5, delivery_address), \
                 notes = COALESCE($6, notes) \
             WHERE receipt_id = $1 RETURNING {RECEIPT_COLUMNS}"
        ))
        .bind(receipt_id)
        .bind(set_staff)
        .bind(staff_id)
        .bind(input.issue_date)
        .bind(input.delivery_address.as_deref())
        .bind(input.notes.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update receipt: {}", e)))
    }

    /// Delete a receipt with its line items and payments. Stock consumed by
    /// the line items is not restored.
    #[instrument(skip(self))]
    pub async fn delete_receipt(&self, receipt_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM receipts WHERE receipt_id = $1")
            .bind(receipt_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete receipt: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Line items
    // -------------------------------------------------------------------------

    /// Add a line item to a receipt.
    ///
    /// Captures the product's current price unless an override is given,
    /// decrements the product's stock exactly once, and re-derives the
    /// receipt's total and status. One transaction; stock may go negative.
    #[instrument(skip(self, input), fields(receipt_id = %receipt_id, product_id = %input.product_id))]
    pub async fn add_line_item(
        &self,
        receipt_id: Uuid,
        input: &CreateLineItem,
    ) -> Result<(LineItem, Receipt), AppError> {
        if input.quantity <= 0 {
            ERRORS_TOTAL.with_label_values(&["validation_error"]).inc();
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Quantity must be positive"
            )));
        }

        let timer = DB_QUERY_DURATION
            .with_label_values(&["add_line_item"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM receipts WHERE receipt_id = $1")
                .bind(receipt_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to check receipt: {}", e))
                })?;
        if exists == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!("Receipt not found")));
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1 FOR UPDATE"
        ))
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to lock product: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;

        let applied_price = input.price_override.unwrap_or(product.unit_price);

        let line_item = sqlx::query_as::<_, LineItem>(
            "INSERT INTO line_items (line_item_id, receipt_id, product_id, quantity, applied_price) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING line_item_id, receipt_id, product_id, quantity, applied_price, created_utc",
        )
        .bind(Uuid::new_v4())
        .bind(receipt_id)
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(applied_price)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create line item: {}", e)))?;

        // First creation only; edits never re-apply a stock delta.
        sqlx::query("UPDATE products SET stock = stock - $2 WHERE product_id = $1")
            .bind(input.product_id)
            .bind(input.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to decrement stock: {}", e))
            })?;

        let receipt = recompute_receipt_derived(&mut tx, receipt_id).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(
            line_item_id = %line_item.line_item_id,
            receipt_id = %receipt_id,
            quantity = line_item.quantity,
            total_sale = %receipt.total_sale,
            "Line item added"
        );

        Ok((line_item, receipt))
    }

    /// Edit a line item's quantity or price, then re-derive the receipt.
    /// Stock is not re-adjusted on edits.
    #[instrument(skip(self, input))]
    pub async fn update_line_item(
        &self,
        line_item_id: Uuid,
        input: &UpdateLineItem,
    ) -> Result<(LineItem, Receipt), AppError> {
        if let Some(quantity) = input.quantity {
            if quantity <= 0 {
                ERRORS_TOTAL.with_label_values(&["validation_error"]).inc();
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Quantity must be positive"
                )));
            }
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let line_item = sqlx::query_as::<_, LineItem>(
            "UPDATE line_items SET \
                 quantity = COALESCE($2, quantity), \
                 applied_price = COALESCE($3, applied_price) \
             WHERE line_item_id = $1 \
             RETURNING line_item_id, receipt_id, product_id, quantity, applied_price, created_utc",
        )
        .bind(line_item_id)
        .bind(input.quantity)
        .bind(input.applied_price)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update line item: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Line item not found")))?;

        let receipt = recompute_receipt_derived(&mut tx, line_item.receipt_id).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        Ok((line_item, receipt))
    }

    /// Delete a line item, then re-derive the receipt. Stock consumed at
    /// creation is not restored.
    #[instrument(skip(self))]
    pub async fn delete_line_item(&self, line_item_id: Uuid) -> Result<Receipt, AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let receipt_id = sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM line_items WHERE line_item_id = $1 RETURNING receipt_id",
        )
        .bind(line_item_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete line item: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Line item not found")))?;

        let receipt = recompute_receipt_derived(&mut tx, receipt_id).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        info!(line_item_id = %line_item_id, receipt_id = %receipt_id, "Line item deleted");

        Ok(receipt)
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    /// Record a payment against a receipt and re-derive its collected
    /// amount and status in the same transaction.
    #[instrument(skip(self, input), fields(receipt_id = %receipt_id))]
    pub async fn add_payment(
        &self,
        receipt_id: Uuid,
        input: &CreatePayment,
    ) -> Result<(Payment, Receipt), AppError> {
        if input.amount <= Decimal::ZERO {
            ERRORS_TOTAL.with_label_values(&["validation_error"]).inc();
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Payment amount must be positive"
            )));
        }

        let timer = DB_QUERY_DURATION
            .with_label_values(&["add_payment"])
            .start_timer();

        let pay_date = input.pay_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let payment = sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (payment_id, receipt_id, pay_date, amount, bank_reference) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING payment_id, receipt_id, pay_date, amount, bank_reference, created_utc",
        )
        .bind(Uuid::new_v4())
        .bind(receipt_id)
        .bind(pay_date)
        .bind(input.amount)
        .bind(input.bank_reference.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(anyhow::anyhow!("Receipt not found"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to record payment: {}", e)),
        })?;

        let receipt = recompute_receipt_derived(&mut tx, receipt_id).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        PAYMENT_AMOUNT_TOTAL
            .with_label_values(&["recorded"])
            .inc_by(input.amount.to_f64().unwrap_or(0.0));

        info!(
            payment_id = %payment.payment_id,
            receipt_id = %receipt_id,
            amount = %payment.amount,
            status = %receipt.status,
            "Payment recorded"
        );

        Ok((payment, receipt))
    }

    /// Remove a payment and re-derive the parent receipt from the payments
    /// that remain.
    #[instrument(skip(self))]
    pub async fn remove_payment(&self, payment_id: Uuid) -> Result<Receipt, AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let (receipt_id, amount) = sqlx::query_as::<_, (Uuid, Decimal)>(
            "DELETE FROM payments WHERE payment_id = $1 RETURNING receipt_id, amount",
        )
        .bind(payment_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete payment: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

        let receipt = recompute_receipt_derived(&mut tx, receipt_id).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        PAYMENT_AMOUNT_TOTAL
            .with_label_values(&["removed"])
            .inc_by(amount.to_f64().unwrap_or(0.0));

        info!(
            payment_id = %payment_id,
            receipt_id = %receipt_id,
            status = %receipt.status,
            "Payment removed"
        );

        Ok(receipt)
    }

    // -------------------------------------------------------------------------
    // Expenses
    // -------------------------------------------------------------------------

    /// Create an expense.
    #[instrument(skip(self, input), fields(vendor_id = %input.vendor_id))]
    pub async fn create_expense(&self, input: &CreateExpense) -> Result<Expense, AppError> {
        let issue_date = input
            .issue_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let expense = sqlx::query_as::<_, Expense>(
            "INSERT INTO expenses \
                 (expense_id, vendor_id, description, category, amount, issue_date, due_date, \
                  document_ref) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING expense_id, vendor_id, description, category, amount, issue_date, \
                       due_date, status, document_ref, created_utc",
        )
        .bind(Uuid::new_v4())
        .bind(input.vendor_id)
        .bind(&input.description)
        .bind(input.category.as_str())
        .bind(input.amount)
        .bind(issue_date)
        .bind(input.due_date)
        .bind(input.document_ref.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(anyhow::anyhow!("Vendor not found"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create expense: {}", e)),
        })?;

        info!(expense_id = %expense.expense_id, amount = %expense.amount, "Expense created");

        Ok(expense)
    }

    /// Get an expense by ID.
    pub async fn get_expense(&self, expense_id: Uuid) -> Result<Option<Expense>, AppError> {
        sqlx::query_as::<_, Expense>(
            "SELECT expense_id, vendor_id, description, category, amount, issue_date, due_date, \
                    status, document_ref, created_utc \
             FROM expenses WHERE expense_id = $1",
        )
        .bind(expense_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get expense: {}", e)))
    }

    /// List expenses, newest first.
    pub async fn list_expenses(
        &self,
        filter: &ListExpensesFilter,
    ) -> Result<Vec<Expense>, AppError> {
        sqlx::query_as::<_, Expense>(
            "SELECT expense_id, vendor_id, description, category, amount, issue_date, due_date, \
                    status, document_ref, created_utc \
             FROM expenses \
             WHERE ($1::date IS NULL OR issue_date >= $1) \
               AND ($2::date IS NULL OR issue_date <= $2) \
               AND ($3::text IS NULL OR status = $3) \
               AND ($4::uuid IS NULL OR vendor_id = $4) \
             ORDER BY issue_date DESC",
        )
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.vendor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list expenses: {}", e)))
    }

    /// Update an expense (including the PENDING -> PAID status flip).
    #[instrument(skip(self, input))]
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        input: &UpdateExpense,
    ) -> Result<Option<Expense>, AppError> {
        let (set_due_date, due_date) = match input.due_date {
            Some(value) => (true, value),
            None => (false, None),
        };

        sqlx::query_as::<_, Expense>(
            "UPDATE expenses SET \
                 description = COALESCE($2, description), \
                 category = COALESCE($3, category), \
                 amount = COALESCE($4, amount), \
                 due_date = CASE WHEN $5 THEN $6 ELSE due_date END, \
                 status = COALESCE($7, status), \
                 document_ref = COALESCE($8, document_ref) \
             WHERE expense_id = $1 \
             RETURNING expense_id, vendor_id, description, category, amount, issue_date, \
                       due_date, status, document_ref, created_utc",
        )
        .bind(expense_id)
        .bind(input.description.as_deref())
        .bind(input.category.map(|c| c.as_str()))
        .bind(input.amount)
        .bind(set_due_date)
        .bind(due_date)
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.document_ref.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update expense: {}", e)))
    }

    /// Delete an expense.
    #[instrument(skip(self))]
    pub async fn delete_expense(&self, expense_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM expenses WHERE expense_id = $1")
            .bind(expense_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete expense: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Attendance
    // -------------------------------------------------------------------------

    /// Create an attendance record.
    #[instrument(skip(self, input), fields(staff_id = %input.staff_id))]
    pub async fn create_attendance(
        &self,
        input: &CreateAttendance,
    ) -> Result<AttendanceRecord, AppError> {
        let work_date = input
            .work_date
            .unwrap_or_else(|| Utc::now().date_naive());

        sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance (attendance_id, staff_id, work_date, clock_in, clock_out) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING attendance_id, staff_id, work_date, clock_in, clock_out, created_utc",
        )
        .bind(Uuid::new_v4())
        .bind(input.staff_id)
        .bind(work_date)
        .bind(input.clock_in)
        .bind(input.clock_out)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(anyhow::anyhow!("Staff member not found"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create attendance: {}", e)),
        })
    }

    /// List attendance records, newest first.
    pub async fn list_attendance(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT attendance_id, staff_id, work_date, clock_in, clock_out, created_utc \
             FROM attendance \
             WHERE ($1::uuid IS NULL OR staff_id = $1) \
               AND ($2::date IS NULL OR work_date >= $2) \
               AND ($3::date IS NULL OR work_date <= $3) \
             ORDER BY work_date DESC",
        )
        .bind(filter.staff_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list attendance: {}", e)))
    }

    // -------------------------------------------------------------------------
    // Reporting (read-only)
    // -------------------------------------------------------------------------

    /// Dashboard summary over a date range. Outstanding debt is global,
    /// not restricted to the range.
    #[instrument(skip(self))]
    pub async fn summarize(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        low_stock_threshold: i32,
    ) -> Result<PeriodSummary, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["summarize"])
            .start_timer();

        let (total_sales, total_collected) = sqlx::query_as::<_, (Decimal, Decimal)>(
            "SELECT COALESCE(SUM(total_sale), 0), COALESCE(SUM(collected), 0) \
             FROM receipts WHERE issue_date BETWEEN $1 AND $2",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum receipts: {}", e)))?;

        let total_expenses = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE issue_date BETWEEN $1 AND $2",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum expenses: {}", e)))?;

        let outstanding = self.total_outstanding().await?;

        let low_stock = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock <= $1 \
             ORDER BY stock ASC LIMIT 5"
        ))
        .bind(low_stock_threshold)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to query low stock: {}", e))
        })?;

        let recent_receipts = sqlx::query_as::<_, Receipt>(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipts WHERE issue_date BETWEEN $1 AND $2 \
             ORDER BY issue_date DESC, created_utc DESC LIMIT 10"
        ))
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to query recent receipts: {}", e))
        })?;

        timer.observe_duration();

        Ok(PeriodSummary {
            start_date,
            end_date,
            total_sales,
            total_collected,
            total_expenses,
            net_profit: total_sales - total_expenses,
            outstanding,
            low_stock,
            recent_receipts,
        })
    }

    /// Sum of (total - collected) across all receipts that are not fully
    /// paid, independent of any date filter.
    pub async fn total_outstanding(&self) -> Result<Decimal, AppError> {
        sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_sale - collected), 0) FROM receipts WHERE status <> $1",
        )
        .bind(PaymentStatus::Paid.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to sum outstanding: {}", e))
        })
    }

    /// Tabular movement report for the external spreadsheet exporter.
    #[instrument(skip(self))]
    pub async fn report_rows(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ReportRows, AppError> {
        let receipts = sqlx::query_as::<_, ReceiptReportRow>(
            "SELECT r.issue_date, r.receipt_number, c.contact_name AS client_name, r.status, \
                    r.total_sale \
             FROM receipts r JOIN clients c ON c.client_id = r.client_id \
             WHERE r.issue_date BETWEEN $1 AND $2 \
             ORDER BY r.issue_date, r.receipt_number",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to query receipt rows: {}", e))
        })?;

        let expenses = sqlx::query_as::<_, ExpenseReportRow>(
            "SELECT e.issue_date, v.name AS vendor_name, e.description, e.category, e.status, \
                    e.amount \
             FROM expenses e JOIN vendors v ON v.vendor_id = e.vendor_id \
             WHERE e.issue_date BETWEEN $1 AND $2 \
             ORDER BY e.issue_date",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to query expense rows: {}", e))
        })?;

        let receipt_total = receipts.iter().map(|r| r.total_sale).sum();
        let expense_total = expenses.iter().map(|e| e.amount).sum();

        let receipt_columns = registry::descriptor("receipt")
            .map(|d| d.report_columns.to_vec())
            .unwrap_or_default();
        let expense_columns = registry::descriptor("expense")
            .map(|d| d.report_columns.to_vec())
            .unwrap_or_default();

        Ok(ReportRows {
            start_date,
            end_date,
            receipt_columns,
            receipts,
            receipt_total,
            expense_columns,
            expenses,
            expense_total,
        })
    }
}

/// Re-derive a receipt's total, collected amount and status from its current
/// line items and payments. Idempotent; always runs inside the caller's
/// transaction so a failure rolls back the triggering write.
async fn recompute_receipt_derived(
    tx: &mut Transaction<'_, Postgres>,
    receipt_id: Uuid,
) -> Result<Receipt, AppError> {
    let total = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(quantity * applied_price), 0) FROM line_items WHERE receipt_id = $1",
    )
    .bind(receipt_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum line items: {}", e)))?;

    let collected = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE receipt_id = $1",
    )
    .bind(receipt_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum payments: {}", e)))?;

    let status = PaymentStatus::derive(collected, total);

    sqlx::query_as::<_, Receipt>(&format!(
        "UPDATE receipts SET total_sale = $2, collected = $3, status = $4 \
         WHERE receipt_id = $1 RETURNING {RECEIPT_COLUMNS}"
    ))
    .bind(receipt_id)
    .bind(total)
    .bind(collected)
    .bind(status.as_str())
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to store derived fields: {}", e)))?
    .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Receipt not found")))
}
