// [libs/domain/billing/src/descriptor.rs]
/*!
 * APARATO: SERVICE DESCRIPTOR
 * RESPONSABILIDAD: PARÁMETROS DE NEGOCIO QUE DIFERENCIAN GPS/VOZ/ELIoT (§4.9.1, §9).
 *
 * Sustituye la cadena de herencia Base→{GPS,VOZ,ELIoT} por una tabla de
 * datos. El resto de la tabla de estrategia citada en §9 — selector,
 * filtro y mapeador de commit — requiere tipos de E/S (SQL, cola, proveedor)
 * y se ensambla en la capa de aplicación sobre estos parámetros puros.
 */

use recharge_domain_models::ServiceKind;

/// De dónde proviene el monto a cobrar para un servicio dado (§4.9.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    /// Monto fijo de configuración (GPS).
    FixedConfig,
    /// Derivado del código de producto de la suscripción (VOZ).
    ProductCode,
    /// `importe_recarga` por candidato, vía `ProductCatalog` (ELIoT).
    PerCandidate,
}

/// De dónde provienen los días de vigencia añadidos (§4.9.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysSource {
    FixedConfig,
    ProductCode,
    PerCandidate,
}

/// Parámetros de negocio por servicio, consultados por el procesador y el
/// motor de commit para decidir de dónde leer monto/días y qué literal usar.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDescriptor {
    pub kind: ServiceKind,
    pub amount_source: AmountSource,
    pub days_source: DaysSource,
}

impl ServiceDescriptor {
    pub const fn for_kind(kind: ServiceKind) -> Self {
        match kind {
            ServiceKind::Gps => ServiceDescriptor {
                kind,
                amount_source: AmountSource::FixedConfig,
                days_source: DaysSource::FixedConfig,
            },
            ServiceKind::Voz => ServiceDescriptor {
                kind,
                amount_source: AmountSource::ProductCode,
                days_source: DaysSource::ProductCode,
            },
            ServiceKind::Eliot => ServiceDescriptor {
                kind,
                amount_source: AmountSource::PerCandidate,
                days_source: DaysSource::PerCandidate,
            },
        }
    }

    pub fn type_literal(&self) -> &'static str {
        self.kind.billing_type_literal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gps_sources_amount_and_days_from_config() {
        let d = ServiceDescriptor::for_kind(ServiceKind::Gps);
        assert_eq!(d.amount_source, AmountSource::FixedConfig);
        assert_eq!(d.days_source, DaysSource::FixedConfig);
        assert_eq!(d.type_literal(), "rastreo");
    }

    #[test]
    fn eliot_sources_amount_and_days_per_candidate() {
        let d = ServiceDescriptor::for_kind(ServiceKind::Eliot);
        assert_eq!(d.amount_source, AmountSource::PerCandidate);
        assert_eq!(d.days_source, DaysSource::PerCandidate);
    }
}
