/// Округление до `places` знаков после запятой (half away from zero)
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Отбрасывание лишних знаков (округление вниз)
pub fn floor_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).floor() / factor
}
