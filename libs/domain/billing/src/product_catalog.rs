// [libs/domain/billing/src/product_catalog.rs]
/*!
 * APARATO: ELIOT PRODUCT CATALOG
 * RESPONSABILIDAD: TRADUCE `importe_recarga` A `{productCode, days}` (§4.9.2).
 *
 * Importes sin mapeo son un error de negocio (BUSINESS), no un fallo de red:
 * nunca se reintentan, se cuentan en `failed` y se reportan de inmediato.
 */

use crate::error::BillingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EliotProduct {
    pub product_code: &'static str,
    pub days: i64,
}

/// Tabla fija de SKUs ELIoT. Ampliar aquí si el carrier agrega denominaciones.
const TABLE: &[(i64, EliotProduct)] = &[
    (10, EliotProduct { product_code: "TEL010", days: 7 }),
    (50, EliotProduct { product_code: "TEL050", days: 30 }),
    (500, EliotProduct { product_code: "TEL500", days: 60 }),
];

pub struct ProductCatalog;

impl ProductCatalog {
    pub fn lookup(importe_recarga: i64) -> Result<EliotProduct, BillingError> {
        TABLE
            .iter()
            .find(|(amount, _)| *amount == importe_recarga)
            .map(|(_, product)| *product)
            .ok_or(BillingError::UnmappedProductAmount { amount: importe_recarga })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_denominations() {
        assert_eq!(ProductCatalog::lookup(10).unwrap().product_code, "TEL010");
        assert_eq!(ProductCatalog::lookup(50).unwrap().days, 30);
        assert_eq!(ProductCatalog::lookup(500).unwrap().product_code, "TEL500");
    }

    #[test]
    fn rejects_unmapped_amount_as_business_error() {
        let err = ProductCatalog::lookup(17).unwrap_err();
        assert!(matches!(err, BillingError::UnmappedProductAmount { amount: 17 }));
    }
}
