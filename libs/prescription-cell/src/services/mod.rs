pub mod recorder;

pub use recorder::PrescriptionService;
