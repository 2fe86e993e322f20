// Dashboard handlers (d100)
pub mod d100_floor_prices;
