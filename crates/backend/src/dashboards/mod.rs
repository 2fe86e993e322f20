pub mod d100_floor_prices;
