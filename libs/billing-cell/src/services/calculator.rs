use serde::Serialize;

/// Line items for one visit. The discount applies to the consultation fee
/// only; medicine prices are charged as listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillBreakdown {
    pub doctor_fee: f64,
    pub medicine_fee: f64,
    pub discount: f64,
    pub total: f64,
}

pub fn compute_bill(
    consultation_fee: f64,
    discount_percent: f64,
    medicine_prices: &[f64],
) -> BillBreakdown {
    let doctor_fee = consultation_fee - consultation_fee * (discount_percent / 100.0);
    let medicine_fee: f64 = medicine_prices.iter().sum();

    BillBreakdown {
        doctor_fee,
        medicine_fee,
        discount: discount_percent,
        total: doctor_fee + medicine_fee,
    }
}
