//! Jurisdiction consistency rules and VAT (SD) computation.
//!
//! The zone/division/circle hierarchy and the commission-rate scoping
//! both come from synced master data; everything here is pure over the
//! fetched models so the rules are testable without a database.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{circles, commission_rates, divisions, prelude::*};
use crate::errors::{IntegrationError, Result};

/// A transaction's resolved jurisdiction selection.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub zone_id: &'a str,
    pub division_id: &'a str,
    pub circle_id: &'a str,
}

/// Check that the selected circle belongs to the selected division and
/// the division to the selected zone.
pub fn validate_hierarchy(
    selection: &Selection<'_>,
    division: &divisions::Model,
    circle: &circles::Model,
) -> std::result::Result<(), String> {
    if division.zone_id != selection.zone_id {
        return Err(format!(
            "division {} belongs to zone {}, not {}",
            division.division_id, division.zone_id, selection.zone_id
        ));
    }
    if circle.division_id != selection.division_id {
        return Err(format!(
            "circle {} belongs to division {}, not {}",
            circle.circle_id, circle.division_id, selection.division_id
        ));
    }
    Ok(())
}

/// Whether a commission rate covers the given jurisdiction and service
/// type. Unset scope fields on the rate mean "applies to all".
pub fn rate_applies(
    rate: &commission_rates::Model,
    selection: &Selection<'_>,
    service_type_code: &str,
) -> bool {
    if rate.zone_id != selection.zone_id {
        return false;
    }
    if let Some(division_id) = &rate.division_id {
        if division_id != selection.division_id {
            return false;
        }
    }
    if let Some(circle_id) = &rate.circle_id {
        if circle_id != selection.circle_id {
            return false;
        }
    }
    if let Some(code) = &rate.service_type_code {
        if code != service_type_code {
            return false;
        }
    }
    true
}

/// Narrower scope wins when several rates cover the same transaction.
pub fn specificity(rate: &commission_rates::Model) -> u8 {
    let mut score = 0;
    if rate.division_id.is_some() {
        score += 1;
    }
    if rate.circle_id.is_some() {
        score += 1;
    }
    if rate.service_type_code.is_some() {
        score += 1;
    }
    score
}

/// Resolve the applicable commission rate for a transaction, or fail
/// with a validation error telling the operator which scope is missing.
pub async fn resolve_rate(
    db: &DatabaseConnection,
    selection: &Selection<'_>,
    service_type_code: &str,
) -> Result<commission_rates::Model> {
    let candidates = CommissionRates::find()
        .filter(commission_rates::Column::ZoneId.eq(selection.zone_id))
        .all(db)
        .await?;

    candidates
        .into_iter()
        .filter(|rate| rate_applies(rate, selection, service_type_code))
        .max_by_key(specificity)
        .ok_or_else(|| {
            IntegrationError::Validation(format!(
                "no commission rate covers zone {} / division {} / circle {} / service type {}; sync commission rates first",
                selection.zone_id, selection.division_id, selection.circle_id, service_type_code
            ))
        })
}

/// SD amount for a transaction: `txn_amount * rate%`, rounded to 2 dp.
pub fn compute_sd_amount(txn_amount: Decimal, rate_percent: Decimal) -> Decimal {
    (txn_amount * rate_percent / dec!(100)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn division(division_id: &str, zone_id: &str) -> divisions::Model {
        divisions::Model {
            id: 1,
            division_id: division_id.to_string(),
            name: "Division".to_string(),
            zone_id: zone_id.to_string(),
            updated_at: None,
        }
    }

    fn circle(circle_id: &str, division_id: &str, zone_id: &str) -> circles::Model {
        circles::Model {
            id: 1,
            circle_id: circle_id.to_string(),
            name: "Circle".to_string(),
            division_id: division_id.to_string(),
            zone_id: zone_id.to_string(),
            updated_at: None,
        }
    }

    fn rate(
        id: &str,
        zone: &str,
        division: Option<&str>,
        circle: Option<&str>,
        service: Option<&str>,
        percent: Decimal,
    ) -> commission_rates::Model {
        commission_rates::Model {
            id: 1,
            commission_rate_id: id.to_string(),
            rate: percent,
            zone_id: zone.to_string(),
            division_id: division.map(String::from),
            circle_id: circle.map(String::from),
            service_type_code: service.map(String::from),
            updated_at: None,
        }
    }

    const SELECTION: Selection<'static> = Selection {
        zone_id: "Z-01",
        division_id: "D-02",
        circle_id: "C-03",
    };

    #[test]
    fn consistent_hierarchy_passes() {
        let d = division("D-02", "Z-01");
        let c = circle("C-03", "D-02", "Z-01");
        assert!(validate_hierarchy(&SELECTION, &d, &c).is_ok());
    }

    #[test]
    fn division_from_other_zone_is_rejected() {
        let d = division("D-02", "Z-09");
        let c = circle("C-03", "D-02", "Z-09");
        let err = validate_hierarchy(&SELECTION, &d, &c).unwrap_err();
        assert!(err.contains("zone Z-09"));
    }

    #[test]
    fn circle_from_other_division_is_rejected() {
        let d = division("D-02", "Z-01");
        let c = circle("C-03", "D-07", "Z-01");
        assert!(validate_hierarchy(&SELECTION, &d, &c).is_err());
    }

    #[test]
    fn zone_wide_rate_applies_everywhere_in_zone() {
        let r = rate("CR-1", "Z-01", None, None, None, dec!(5));
        assert!(rate_applies(&r, &SELECTION, "ST-RESTAURANT"));
    }

    #[test]
    fn service_scoped_rate_only_applies_to_that_service() {
        let r = rate("CR-2", "Z-01", None, None, Some("ST-HOTEL"), dec!(10));
        assert!(!rate_applies(&r, &SELECTION, "ST-RESTAURANT"));
        assert!(rate_applies(&r, &SELECTION, "ST-HOTEL"));
    }

    #[test]
    fn narrower_scope_beats_zone_wide_rate() {
        let wide = rate("CR-1", "Z-01", None, None, None, dec!(5));
        let narrow = rate("CR-2", "Z-01", Some("D-02"), Some("C-03"), None, dec!(7));
        assert!(specificity(&narrow) > specificity(&wide));
    }

    #[test]
    fn sd_amount_rounds_to_two_decimals() {
        assert_eq!(compute_sd_amount(dec!(1200), dec!(5)), dec!(60.00));
        assert_eq!(compute_sd_amount(dec!(999.99), dec!(7.5)), dec!(75.00));
        assert_eq!(compute_sd_amount(dec!(100.10), dec!(3.33)), dec!(3.33));
    }
}
