pub mod returns;

pub use returns::ReturnMetrics;
