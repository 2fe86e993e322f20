pub mod d100_floor_prices;

pub use d100_floor_prices::ui::FloorPricesDashboard;
