//! # Wire DTOs
//!
//! Request and response bodies as the web client sends and expects them:
//! camelCase Spanish keys, money as JSON numbers of major units.
//!
//! ```text
//! POST sale      {formaPago, productos:[{id, cantidad}]}
//!             →  {ok, ventaId, total, formaPago, itemsCount}
//! POST receipt   {entradas:[{id, cantidad, precioCompra?, precioVenta?}]}
//!             →  {mensaje, totalActualizados, items:[Product]}
//! POST quotation {cliente?, formaPago?, productos:[{id, cantidad}]}
//!             →  {cotizacionId, total}      (update: {ok, id, total})
//! ```
//!
//! Missing lists and strings decode to empty values so that the ledger's
//! own validation produces the error message.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use tlapa_db::QuotationTotals;
use tlapa_core::validation::{parse_price, validate_receipt_entry};
use tlapa_core::{
    LineRequest, NewProduct, Product, ProductPatch, Quotation, QuotationDetail, QuotationInput,
    QuotationLine, QuotationStatus, ReceiptEntry, SaleDetail, SaleLine, SaleReceipt, SaleSummary, ValidationError,
};

// =============================================================================
// Line Items
// =============================================================================

/// One `{id, cantidad}` pair of a sale or quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemDto {
    pub id: i64,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
}

impl From<LineItemDto> for LineRequest {
    fn from(item: LineItemDto) -> Self {
        LineRequest::new(item.id, item.quantity)
    }
}

fn line_requests(items: &[LineItemDto]) -> Vec<LineRequest> {
    items.iter().copied().map(LineRequest::from).collect()
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    #[serde(rename = "formaPago", default)]
    pub payment_method: String,
    #[serde(rename = "productos", default)]
    pub items: Vec<LineItemDto>,
}

impl SaleRequest {
    pub fn lines(&self) -> Vec<LineRequest> {
        line_requests(&self.items)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SaleResponse {
    pub ok: bool,
    #[serde(rename = "ventaId")]
    pub sale_id: i64,
    pub total: f64,
    #[serde(rename = "formaPago")]
    pub payment_method: String,
    #[serde(rename = "itemsCount")]
    pub items_count: usize,
}

impl From<SaleReceipt> for SaleResponse {
    fn from(receipt: SaleReceipt) -> Self {
        SaleResponse {
            ok: true,
            sale_id: receipt.sale_id,
            total: receipt.total.to_major_f64(),
            payment_method: receipt.payment_method,
            items_count: receipt.items_count,
        }
    }
}

/// A row of the sales history.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SaleSummaryDto {
    pub id: i64,
    #[serde(rename = "fecha")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub total: f64,
    #[serde(rename = "formaPago")]
    pub payment_method: String,
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    #[serde(rename = "nombreVendedor")]
    pub seller_name: Option<String>,
}

impl From<SaleSummary> for SaleSummaryDto {
    fn from(summary: SaleSummary) -> Self {
        let sale = summary.sale;
        SaleSummaryDto {
            id: sale.id,
            created_at: sale.created_at,
            total: sale.total.to_major_f64(),
            payment_method: sale.payment_method,
            user_id: sale.user_id,
            seller_name: summary.seller_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SaleLineDto {
    #[serde(rename = "productoId")]
    pub product_id: i64,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "precioUnitario")]
    pub unit_price: f64,
    pub subtotal: f64,
}

impl From<SaleLine> for SaleLineDto {
    fn from(line: SaleLine) -> Self {
        SaleLineDto {
            product_id: line.product_id,
            description: line.description,
            quantity: line.quantity,
            unit_price: line.unit_price.to_major_f64(),
            subtotal: line.subtotal.to_major_f64(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SaleDetailDto {
    pub id: i64,
    #[serde(rename = "fecha")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub total: f64,
    #[serde(rename = "formaPago")]
    pub payment_method: String,
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    #[serde(rename = "productos")]
    pub lines: Vec<SaleLineDto>,
}

impl From<SaleDetail> for SaleDetailDto {
    fn from(detail: SaleDetail) -> Self {
        let sale = detail.sale;
        SaleDetailDto {
            id: sale.id,
            created_at: sale.created_at,
            total: sale.total.to_major_f64(),
            payment_method: sale.payment_method,
            user_id: sale.user_id,
            lines: detail.lines.into_iter().map(SaleLineDto::from).collect(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as the client sees it.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ProductDto {
    pub id: i64,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "codigoBarras")]
    pub barcode: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "ubicacion")]
    pub location: Option<String>,
    #[serde(rename = "cantidadStock")]
    pub stock: i64,
    #[serde(rename = "stockMinimo")]
    pub min_stock: i64,
    #[serde(rename = "stockMaximo")]
    pub max_stock: i64,
    #[serde(rename = "precioCompra")]
    pub purchase_price: f64,
    #[serde(rename = "precioVenta")]
    pub sale_price: f64,
    #[serde(rename = "categoriaId")]
    pub category_id: Option<i64>,
    #[serde(rename = "proveedorId")]
    pub supplier_id: Option<i64>,
    #[serde(rename = "activo")]
    pub is_active: bool,
    #[serde(rename = "imagen")]
    pub image: Option<String>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            id: p.id,
            code: p.code,
            barcode: p.barcode,
            description: p.description,
            location: p.location,
            stock: p.stock,
            min_stock: p.min_stock,
            max_stock: p.max_stock,
            purchase_price: p.purchase_price.to_major_f64(),
            sale_price: p.sale_price.to_major_f64(),
            category_id: p.category_id,
            supplier_id: p.supplier_id,
            is_active: p.is_active,
            image: p.image,
        }
    }
}

/// Body of a product create.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct NewProductRequest {
    #[serde(rename = "codigo", default)]
    pub code: String,
    #[serde(rename = "codigoBarras", default)]
    pub barcode: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "ubicacion", default)]
    pub location: Option<String>,
    #[serde(rename = "cantidadStock", default)]
    pub stock: i64,
    #[serde(rename = "stockMinimo", default)]
    pub min_stock: i64,
    #[serde(rename = "stockMaximo", default)]
    pub max_stock: i64,
    #[serde(rename = "precioCompra", default)]
    #[ts(as = "f64")]
    pub purchase_price: Decimal,
    #[serde(rename = "precioVenta", default)]
    #[ts(as = "f64")]
    pub sale_price: Decimal,
    #[serde(rename = "categoriaId", default)]
    pub category_id: Option<i64>,
    #[serde(rename = "proveedorId", default)]
    pub supplier_id: Option<i64>,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
}

impl NewProductRequest {
    /// Rounds the prices to cents; the rest is validated on insert.
    pub fn to_new_product(&self) -> Result<NewProduct, ValidationError> {
        Ok(NewProduct {
            code: self.code.clone(),
            barcode: self.barcode.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            stock: self.stock,
            min_stock: self.min_stock,
            max_stock: self.max_stock,
            purchase_price: parse_price("precioCompra", self.purchase_price)?,
            sale_price: parse_price("precioVenta", self.sale_price)?,
            category_id: self.category_id,
            supplier_id: self.supplier_id,
            image: self.image.clone(),
        })
    }
}

/// Body of a product edit. Absent keys are left untouched; an explicit
/// `null` clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdateRequest {
    #[serde(rename = "codigo", default)]
    pub code: Option<String>,
    #[serde(rename = "codigoBarras", default, deserialize_with = "double_option")]
    pub barcode: Option<Option<String>>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "ubicacion", default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(rename = "cantidadStock", default)]
    pub stock: Option<i64>,
    #[serde(rename = "stockMinimo", default)]
    pub min_stock: Option<i64>,
    #[serde(rename = "stockMaximo", default)]
    pub max_stock: Option<i64>,
    #[serde(rename = "precioCompra", default)]
    #[ts(as = "Option<f64>")]
    pub purchase_price: Option<Decimal>,
    #[serde(rename = "precioVenta", default)]
    #[ts(as = "Option<f64>")]
    pub sale_price: Option<Decimal>,
    #[serde(rename = "categoriaId", default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i64>>,
    #[serde(rename = "proveedorId", default, deserialize_with = "double_option")]
    pub supplier_id: Option<Option<i64>>,
    #[serde(rename = "imagen", default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
}

impl ProductUpdateRequest {
    pub fn to_patch(&self) -> Result<ProductPatch, ValidationError> {
        Ok(ProductPatch {
            code: self.code.clone(),
            barcode: self.barcode.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            stock: self.stock,
            min_stock: self.min_stock,
            max_stock: self.max_stock,
            purchase_price: self.purchase_price.map(|p| parse_price("precioCompra", p)).transpose()?,
            sale_price: self.sale_price.map(|p| parse_price("precioVenta", p)).transpose()?,
            category_id: self.category_id,
            supplier_id: self.supplier_id,
            image: self.image.clone(),
        })
    }
}

/// A present key (even `null`) becomes `Some(..)`; an absent key stays
/// `None` through `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Inventory Receipt
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptRequest {
    #[serde(rename = "entradas", default)]
    pub entries: Vec<ReceiptEntryDto>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptEntryDto {
    pub id: i64,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "precioCompra", default)]
    #[ts(as = "Option<f64>")]
    pub purchase_price: Option<Decimal>,
    #[serde(rename = "precioVenta", default)]
    #[ts(as = "Option<f64>")]
    pub sale_price: Option<Decimal>,
}

impl ReceiptRequest {
    /// Converts the entries in order, rounding prices to cents.
    ///
    /// The first invalid entry stops the conversion and is reported with
    /// its position.
    pub fn entries(&self) -> Result<Vec<ReceiptEntry>, ValidationError> {
        if self.entries.is_empty() {
            return Err(ValidationError::Empty {
                field: "entradas".to_string(),
            });
        }

        self.entries
            .iter()
            .enumerate()
            .map(|(index, dto)| dto.to_entry().map_err(|e| e.at_item(index, dto.id)))
            .collect()
    }
}

impl ReceiptEntryDto {
    fn to_entry(&self) -> Result<ReceiptEntry, ValidationError> {
        let purchase = self.purchase_price.map(|p| parse_price("precioCompra", p)).transpose()?;
        let sale = self.sale_price.map(|p| parse_price("precioVenta", p)).transpose()?;
        let entry = ReceiptEntry::new(self.id, self.quantity).with_prices(purchase, sale);
        validate_receipt_entry(&entry)?;
        Ok(entry)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ReceiptResponse {
    pub mensaje: String,
    #[serde(rename = "totalActualizados")]
    pub total_updated: usize,
    pub items: Vec<ProductDto>,
}

impl ReceiptResponse {
    pub fn new(products: Vec<Product>) -> Self {
        ReceiptResponse {
            mensaje: "Inventario actualizado correctamente".to_string(),
            total_updated: products.len(),
            items: products.into_iter().map(ProductDto::from).collect(),
        }
    }
}

// =============================================================================
// Quotation
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct QuotationRequest {
    #[serde(rename = "cliente", default)]
    pub client: Option<String>,
    #[serde(rename = "formaPago", default)]
    pub payment_method: Option<String>,
    #[serde(rename = "productos", default)]
    pub items: Vec<LineItemDto>,
}

impl QuotationRequest {
    pub fn to_input(&self) -> QuotationInput {
        QuotationInput {
            client: self.client.clone(),
            payment_method: self.payment_method.clone(),
            lines: line_requests(&self.items),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct QuotationCreated {
    #[serde(rename = "cotizacionId")]
    pub quotation_id: i64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct QuotationUpdated {
    pub ok: bool,
    pub id: i64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct QuotationDto {
    pub id: i64,
    #[serde(rename = "fecha")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "cliente")]
    pub client: String,
    #[serde(rename = "formaPago")]
    pub payment_method: String,
    pub total: f64,
    #[serde(rename = "estado")]
    pub status: QuotationStatus,
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    #[serde(rename = "nombreVendedor")]
    pub seller_name: Option<String>,
}

impl From<Quotation> for QuotationDto {
    fn from(q: Quotation) -> Self {
        QuotationDto {
            id: q.id,
            created_at: q.created_at,
            client: q.client,
            payment_method: q.payment_method,
            total: q.total.to_major_f64(),
            status: q.status,
            user_id: q.user_id,
            seller_name: q.seller_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct QuotationLineDto {
    #[serde(rename = "productoId")]
    pub product_id: i64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "precioUnitario")]
    pub unit_price: f64,
    pub subtotal: f64,
    #[serde(rename = "cantidadStock")]
    pub current_stock: Option<i64>,
}

impl From<QuotationLine> for QuotationLineDto {
    fn from(line: QuotationLine) -> Self {
        QuotationLineDto {
            product_id: line.product_id,
            description: line.description,
            quantity: line.quantity,
            unit_price: line.unit_price.to_major_f64(),
            subtotal: line.subtotal.to_major_f64(),
            current_stock: line.current_stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct QuotationDetailDto {
    #[serde(flatten)]
    pub quotation: QuotationDto,
    #[serde(rename = "productos")]
    pub lines: Vec<QuotationLineDto>,
}

impl From<QuotationTotals> for QuotationCreated {
    fn from(totals: QuotationTotals) -> Self {
        QuotationCreated {
            quotation_id: totals.quotation_id,
            total: totals.total.to_major_f64(),
        }
    }
}

impl From<QuotationTotals> for QuotationUpdated {
    fn from(totals: QuotationTotals) -> Self {
        QuotationUpdated {
            ok: true,
            id: totals.quotation_id,
            total: totals.total.to_major_f64(),
        }
    }
}

impl From<QuotationDetail> for QuotationDetailDto {
    fn from(detail: QuotationDetail) -> Self {
        QuotationDetailDto {
            quotation: QuotationDto::from(detail.quotation),
            lines: detail.lines.into_iter().map(QuotationLineDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tlapa_core::{Money, Sale};

    fn product() -> Product {
        Product {
            id: 4,
            code: "HER-00001".to_string(),
            barcode: Some("7500000000001".to_string()),
            description: "Martillo de uña Mediano".to_string(),
            location: None,
            stock: 12,
            min_stock: 5,
            max_stock: 100,
            purchase_price: Money::from_cents(6_050),
            sale_price: Money::from_cents(10_000),
            category_id: Some(1),
            supplier_id: None,
            is_active: true,
            image: None,
        }
    }

    #[test]
    fn test_sale_request_decoding() {
        let req: SaleRequest = serde_json::from_str(
            r#"{"formaPago":"Efectivo","productos":[{"id":7,"cantidad":2},{"id":7,"cantidad":3}]}"#,
        )
        .unwrap();
        assert_eq!(req.payment_method, "Efectivo");
        assert_eq!(req.lines(), vec![LineRequest::new(7, 2), LineRequest::new(7, 3)]);

        let empty: SaleRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.payment_method.is_empty());
        assert!(empty.lines().is_empty());
    }

    #[test]
    fn test_sale_response_shape() {
        let response = SaleResponse::from(SaleReceipt {
            sale_id: 31,
            total: Money::from_cents(14_250),
            payment_method: "Tarjeta".to_string(),
            items_count: 2,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ok": true,
                "ventaId": 31,
                "total": 142.5,
                "formaPago": "Tarjeta",
                "itemsCount": 2
            })
        );
    }

    #[test]
    fn test_receipt_entries_round_prices() {
        let req: ReceiptRequest = serde_json::from_str(
            r#"{"entradas":[{"id":4,"cantidad":10},{"id":9,"cantidad":2,"precioVenta":"35.505","precioCompra":20}]}"#,
        )
        .unwrap();
        let entries = req.entries().unwrap();

        assert_eq!(entries[0], ReceiptEntry::new(4, 10));
        assert_eq!(entries[1].sale_price, Some(Money::from_cents(3_551)));
        assert_eq!(entries[1].purchase_price, Some(Money::from_cents(2_000)));
    }

    #[test]
    fn test_receipt_entries_report_first_bad_entry() {
        let req: ReceiptRequest = serde_json::from_str(
            r#"{"entradas":[{"id":4,"cantidad":1},{"id":5,"cantidad":0},{"id":6,"cantidad":1,"precioVenta":-1}]}"#,
        )
        .unwrap();
        let err = req.entries().unwrap_err();
        assert_eq!(err.to_string(), "item 1 (product 5): cantidad must be positive");

        let req: ReceiptRequest =
            serde_json::from_str(r#"{"entradas":[{"id":6,"cantidad":1,"precioCompra":-0.5}]}"#).unwrap();
        let err = req.entries().unwrap_err();
        assert_eq!(err.to_string(), "item 0 (product 6): precioCompra must not be negative");

        let empty = ReceiptRequest::default();
        assert!(matches!(empty.entries(), Err(ValidationError::Empty { .. })));
    }

    #[test]
    fn test_receipt_response_shape() {
        let response = ReceiptResponse::new(vec![product()]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["totalActualizados"], 1);
        assert_eq!(json["items"][0]["codigo"], "HER-00001");
        assert_eq!(json["items"][0]["cantidadStock"], 12);
        assert_eq!(json["items"][0]["precioCompra"], 60.5);
        assert_eq!(json["items"][0]["precioVenta"], 100.0);
        assert_eq!(json["items"][0]["activo"], true);
    }

    #[test]
    fn test_quotation_request_defaults() {
        let req: QuotationRequest = serde_json::from_str(r#"{"productos":[{"id":3,"cantidad":0}]}"#).unwrap();
        let input = req.to_input();

        assert_eq!(input.client_or_default(), "Público General");
        assert_eq!(input.payment_method_or_default(), "Efectivo");
        assert_eq!(input.lines, vec![LineRequest::new(3, 0)]);
    }

    #[test]
    fn test_product_update_distinguishes_null_from_absent() {
        let req: ProductUpdateRequest =
            serde_json::from_str(r#"{"codigoBarras":null,"precioVenta":12.5,"ubicacion":"Pasillo 3"}"#).unwrap();
        let patch = req.to_patch().unwrap();

        assert_eq!(patch.barcode, Some(None));
        assert_eq!(patch.location, Some(Some("Pasillo 3".to_string())));
        assert_eq!(patch.image, None);
        assert_eq!(patch.code, None);
        assert_eq!(patch.sale_price, Some(Money::from_cents(1_250)));
        assert_eq!(patch.purchase_price, None);

        let empty: ProductUpdateRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.to_patch().unwrap().is_empty());
    }

    #[test]
    fn test_new_product_rejects_negative_price() {
        let req: NewProductRequest = serde_json::from_str(
            r#"{"codigo":"A-1","descripcion":"Brocha","precioCompra":-3,"precioVenta":10}"#,
        )
        .unwrap();
        let err = req.to_new_product().unwrap_err();
        assert_eq!(err.to_string(), "precioCompra must not be negative");
    }

    #[test]
    fn test_quotation_detail_flattens_header() {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap();
        let detail = QuotationDetail {
            quotation: Quotation {
                id: 8,
                created_at,
                client: "Público General".to_string(),
                payment_method: "Efectivo".to_string(),
                total: Money::from_cents(2_000),
                status: QuotationStatus::Pending,
                user_id: 1,
                seller_name: Some("Cajera Uno".to_string()),
            },
            lines: vec![QuotationLine {
                product_id: 4,
                description: "Brocha".to_string(),
                quantity: 2,
                unit_price: Money::from_cents(1_000),
                subtotal: Money::from_cents(2_000),
                current_stock: Some(1),
            }],
        };

        let json = serde_json::to_value(QuotationDetailDto::from(detail)).unwrap();
        assert_eq!(json["nombreVendedor"], "Cajera Uno");
        assert_eq!(json["productos"][0]["cantidadStock"], 1);
        assert_eq!(json["id"], 8);
        assert_eq!(json["cliente"], "Público General");
        assert_eq!(json["estado"], "pending");
        assert_eq!(json["total"], 20.0);
        assert_eq!(json["productos"][0]["precioUnitario"], 10.0);
    }

    #[test]
    fn test_sale_detail_shape() {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap();
        let detail = SaleDetail {
            sale: Sale {
                id: 5,
                created_at,
                total: Money::from_cents(3_000),
                payment_method: "Efectivo".to_string(),
                user_id: 2,
            },
            lines: vec![SaleLine {
                product_id: 4,
                description: None,
                quantity: 3,
                unit_price: Money::from_cents(1_000),
                subtotal: Money::from_cents(3_000),
            }],
        };

        let json = serde_json::to_value(SaleDetailDto::from(detail)).unwrap();
        assert_eq!(json["formaPago"], "Efectivo");
        assert_eq!(json["productos"][0]["descripcion"], serde_json::Value::Null);
        assert_eq!(json["productos"][0]["subtotal"], 30.0);
    }
}
