use chrono::{DateTime, TimeZone};

/// 四舍五入到指定小数位
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// 将时间格式化为标准时间格式 HH:MM:SS.mmm
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%H:%M:%S%.3f").to_string()
}
