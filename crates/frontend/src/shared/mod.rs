pub mod currency_toggle;
pub mod number_format;
