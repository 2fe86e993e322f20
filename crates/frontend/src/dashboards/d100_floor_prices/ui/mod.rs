mod dashboard;

pub use dashboard::FloorPricesDashboard;
