pub mod calculator;
pub mod payment;

pub use calculator::{compute_bill, BillBreakdown};
pub use payment::BillingService;
